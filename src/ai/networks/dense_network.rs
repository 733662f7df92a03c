use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

/// Fully-connected column scorer.
///
/// ```text
/// Input:  [batch, H*W]   signed occupancy, acting player = +1
/// FC1:    H*W -> hidden, ReLU
/// FC2:    hidden -> hidden, ReLU
/// Output: hidden -> W    (one score per column)
/// ```
#[derive(Module, Debug)]
pub struct DenseNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    output: Linear<B>,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct DenseNetworkConfig {
    pub height: usize,
    pub width: usize,
    #[config(default = 128)]
    pub hidden_size: usize,
}

impl DenseNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DenseNetwork<B> {
        DenseNetwork {
            fc1: LinearConfig::new(self.height * self.width, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.width).init(device),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> DenseNetwork<B> {
    /// Forward pass: input [batch, H*W] -> output [batch, W] column scores.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.fc1.forward(input));
        let x = self.relu.forward(self.fc2.forward(x));
        self.output.forward(x)
    }
}
