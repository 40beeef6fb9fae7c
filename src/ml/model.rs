// ============================================================
// Layer 5 — Emotion CNN
// ============================================================
// A small convolutional classifier for 48×48 grayscale faces:
//
//   Input          [N, 1, 48, 48]
//   Conv 3×3, 32   [N, 32, 46, 46]  + ReLU
//   MaxPool 2×2    [N, 32, 23, 23]
//   Conv 3×3, 64   [N, 64, 21, 21]  + ReLU
//   MaxPool 2×2    [N, 64, 10, 10]
//   Flatten        [N, 6400]
//   Dense 128      [N, 128]         + ReLU
//   Dropout 0.5
//   Dense C        [N, C]           (softmax applied by callers)
//
// forward() returns raw logits. The loss works on log-softmax
// directly for numerical stability; forward_probabilities()
// applies the softmax for prediction.
//
// Loss is categorical cross-entropy against one-hot targets:
//   L = -mean_n( Σ_c  y[n,c] · log softmax(z)[n,c] )
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Relu,
    },
    prelude::*,
    tensor::activation::{log_softmax, softmax},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally; do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct EmotionCnnConfig {
    pub num_classes: usize,
    #[config(default = 48)]
    pub image_size:  usize,
    #[config(default = 0.5)]
    pub dropout:     f64,
}

impl EmotionCnnConfig {
    /// Number of features after the second pooling stage
    pub fn flattened_features(&self) -> usize {
        let after_conv1 = self.image_size.saturating_sub(2);
        let after_pool1 = after_conv1 / 2;
        let after_conv2 = after_pool1.saturating_sub(2);
        let after_pool2 = after_conv2 / 2;
        64 * after_pool2 * after_pool2
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionCnn<B> {
        let conv1  = Conv2dConfig::new([1, 32], [3, 3]).init(device);
        let conv2  = Conv2dConfig::new([32, 64], [3, 3]).init(device);
        let pool   = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();
        let hidden = LinearConfig::new(self.flattened_features(), 128).init(device);
        let output = LinearConfig::new(128, self.num_classes).init(device);

        EmotionCnn {
            conv1,
            conv2,
            pool,
            hidden,
            output,
            dropout:    DropoutConfig::new(self.dropout).init(),
            activation: Relu::new(),
        }
    }
}

#[derive(Module, Debug)]
pub struct EmotionCnn<B: Backend> {
    pub conv1:      Conv2d<B>,
    pub conv2:      Conv2d<B>,
    pub pool:       MaxPool2d,
    pub hidden:     Linear<B>,
    pub output:     Linear<B>,
    pub dropout:    Dropout,
    pub activation: Relu,
}

impl<B: Backend> EmotionCnn<B> {
    /// images: [batch, 1, H, W] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool.forward(self.activation.forward(self.conv1.forward(images)));
        let x = self.pool.forward(self.activation.forward(self.conv2.forward(x)));

        let [batch, channels, height, width] = x.dims();
        let x = x.reshape([batch, channels * height * width]);

        let x = self.activation.forward(self.hidden.forward(x));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }

    /// Softmax class probabilities, each row sums to 1
    pub fn forward_probabilities(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }

    /// Width of the output layer
    pub fn num_classes(&self) -> usize {
        // Linear weights are stored as [d_input, d_output]
        self.output.weight.val().dims()[1]
    }
}

/// Mean categorical cross-entropy of logits against one-hot targets
pub fn categorical_cross_entropy<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let log_probs = log_softmax(logits, 1);
    (targets * log_probs).sum_dim(1).mean().neg()
}

/// How many rows have their argmax on the hot target entry
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> usize {
    let predicted = logits.argmax(1);
    let expected  = targets.argmax(1);
    predicted
        .equal(expected)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}
