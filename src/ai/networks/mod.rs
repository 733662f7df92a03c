mod conv_network;
mod dense_network;

pub use conv_network::{ConvNetwork, ConvNetworkConfig};
pub use dense_network::{DenseNetwork, DenseNetworkConfig};
