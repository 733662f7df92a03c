use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::ai::state_encoding::PLANES;

/// Convolutional column scorer.
///
/// Both convolutions keep the board size, so any board of at least 4x4 fits.
/// ```text
/// Input:  [batch, 2, H, W]
/// Conv1:  2 -> C channels, 3x3 kernel, same padding   =>  [batch, C, H, W]
/// ReLU
/// Conv2:  C -> 2C channels, 3x3 kernel, same padding  =>  [batch, 2C, H, W]
/// ReLU
/// Flatten: 2C*H*W
/// FC1:    2C*H*W -> hidden, ReLU
/// Output: hidden -> W  (one score per column)
/// ```
#[derive(Module, Debug)]
pub struct ConvNetwork<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    fc1: Linear<B>,
    output: Linear<B>,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct ConvNetworkConfig {
    pub height: usize,
    pub width: usize,
    #[config(default = 32)]
    pub channels: usize,
    #[config(default = 128)]
    pub hidden_size: usize,
}

impl ConvNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvNetwork<B> {
        let flat = 2 * self.channels * self.height * self.width;
        ConvNetwork {
            conv1: Conv2dConfig::new([PLANES, self.channels], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            conv2: Conv2dConfig::new([self.channels, 2 * self.channels], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            fc1: LinearConfig::new(flat, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.width).init(device),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> ConvNetwork<B> {
    /// Forward pass: input [batch, 2, H, W] -> output [batch, W] column scores.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.conv1.forward(input));
        let x = self.relu.forward(self.conv2.forward(x));
        let x: Tensor<B, 2> = x.flatten(1, 3);
        let x = self.relu.forward(self.fc1.forward(x));
        self.output.forward(x)
    }
}
