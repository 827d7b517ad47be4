//! Operation codes and their option payloads.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Kind of an operation.
///
/// Builtin kinds map to the numeric operator codes of the serialized model
/// format. Codes this crate has no named variant for round-trip through
/// [`OpCode::Other`]. Comparison goes by numeric code, so `Other(32)` equals
/// [`OpCode::Custom`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpCode {
    Add,
    AveragePool2d,
    Concatenation,
    Conv2d,
    DepthwiseConv2d,
    Dequantize,
    FullyConnected,
    Logistic,
    MaxPool2d,
    Mul,
    Relu,
    Relu6,
    Reshape,
    Softmax,
    Tanh,
    Custom,
    Pad,
    Transpose,
    Mean,
    Sub,
    Div,
    Quantize,
    BatchMatMul,
    /// A builtin code without a named variant.
    Other(i32),
}

impl OpCode {
    /// Numeric operator code used by the serialized format.
    pub fn code(&self) -> i32 {
        match self {
            OpCode::Add => 0,
            OpCode::AveragePool2d => 1,
            OpCode::Concatenation => 2,
            OpCode::Conv2d => 3,
            OpCode::DepthwiseConv2d => 4,
            OpCode::Dequantize => 6,
            OpCode::FullyConnected => 9,
            OpCode::Logistic => 14,
            OpCode::MaxPool2d => 17,
            OpCode::Mul => 18,
            OpCode::Relu => 19,
            OpCode::Relu6 => 21,
            OpCode::Reshape => 22,
            OpCode::Softmax => 25,
            OpCode::Tanh => 28,
            OpCode::Custom => 32,
            OpCode::Pad => 34,
            OpCode::Transpose => 39,
            OpCode::Mean => 40,
            OpCode::Sub => 41,
            OpCode::Div => 42,
            OpCode::Quantize => 114,
            OpCode::BatchMatMul => 126,
            OpCode::Other(code) => *code,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => OpCode::Add,
            1 => OpCode::AveragePool2d,
            2 => OpCode::Concatenation,
            3 => OpCode::Conv2d,
            4 => OpCode::DepthwiseConv2d,
            6 => OpCode::Dequantize,
            9 => OpCode::FullyConnected,
            14 => OpCode::Logistic,
            17 => OpCode::MaxPool2d,
            18 => OpCode::Mul,
            19 => OpCode::Relu,
            21 => OpCode::Relu6,
            22 => OpCode::Reshape,
            25 => OpCode::Softmax,
            28 => OpCode::Tanh,
            32 => OpCode::Custom,
            34 => OpCode::Pad,
            39 => OpCode::Transpose,
            40 => OpCode::Mean,
            41 => OpCode::Sub,
            42 => OpCode::Div,
            114 => OpCode::Quantize,
            126 => OpCode::BatchMatMul,
            other => OpCode::Other(other),
        }
    }

    /// Replaces an [`OpCode::Other`] holding a named code by its variant.
    pub fn normalized(self) -> Self {
        Self::from_code(self.code())
    }

    pub fn is_custom(&self) -> bool {
        self.normalized() == OpCode::Custom
    }

    /// Returns true if `options` is the payload variant this opcode carries.
    ///
    /// Opcodes without options accept only [`OpOptions::None`]. Unnamed
    /// builtins accept anything.
    pub fn options_match(&self, options: &OpOptions) -> bool {
        let op_code = self.normalized();
        match (op_code, options) {
            (OpCode::Other(_), _) => true,
            (OpCode::Add, OpOptions::Add { .. })
            | (OpCode::Sub, OpOptions::Sub { .. })
            | (OpCode::Mul, OpOptions::Mul { .. })
            | (OpCode::Div, OpOptions::Div { .. })
            | (OpCode::Conv2d, OpOptions::Conv2d { .. })
            | (OpCode::DepthwiseConv2d, OpOptions::DepthwiseConv2d { .. })
            | (OpCode::AveragePool2d | OpCode::MaxPool2d, OpOptions::Pool2d { .. })
            | (OpCode::FullyConnected, OpOptions::FullyConnected { .. })
            | (OpCode::Softmax, OpOptions::Softmax { .. })
            | (OpCode::Reshape, OpOptions::Reshape { .. })
            | (OpCode::Concatenation, OpOptions::Concatenation { .. })
            | (OpCode::Mean, OpOptions::Reducer { .. })
            | (OpCode::BatchMatMul, OpOptions::BatchMatMul { .. }) => true,
            (_, OpOptions::None) => !matches!(
                op_code,
                OpCode::Conv2d
                    | OpCode::DepthwiseConv2d
                    | OpCode::AveragePool2d
                    | OpCode::MaxPool2d
                    | OpCode::Softmax
            ),
            _ => false,
        }
    }
}

impl PartialEq for OpCode {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for OpCode {}

impl Hash for OpCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

/// Activation fused into an operation's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FusedActivation {
    #[default]
    None,
    Relu,
    ReluN1To1,
    Relu6,
    Tanh,
    SignBit,
}

impl FusedActivation {
    /// Numeric ID used by the serialized format.
    pub fn to_id(&self) -> u8 {
        match self {
            FusedActivation::None => 0,
            FusedActivation::Relu => 1,
            FusedActivation::ReluN1To1 => 2,
            FusedActivation::Relu6 => 3,
            FusedActivation::Tanh => 4,
            FusedActivation::SignBit => 5,
        }
    }

    /// Creates a FusedActivation from a numeric ID. Unknown IDs yield `None`.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(FusedActivation::None),
            1 => Some(FusedActivation::Relu),
            2 => Some(FusedActivation::ReluN1To1),
            3 => Some(FusedActivation::Relu6),
            4 => Some(FusedActivation::Tanh),
            5 => Some(FusedActivation::SignBit),
            _ => None,
        }
    }
}

/// Padding scheme of windowed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Padding {
    #[default]
    Same,
    Valid,
}

/// Opcode-specific options of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpOptions {
    #[default]
    None,
    Add {
        fused_activation: FusedActivation,
    },
    Sub {
        fused_activation: FusedActivation,
    },
    Mul {
        fused_activation: FusedActivation,
    },
    Div {
        fused_activation: FusedActivation,
    },
    Conv2d {
        padding: Padding,
        stride_w: i32,
        stride_h: i32,
        dilation_w: i32,
        dilation_h: i32,
        fused_activation: FusedActivation,
    },
    DepthwiseConv2d {
        padding: Padding,
        stride_w: i32,
        stride_h: i32,
        depth_multiplier: i32,
        dilation_w: i32,
        dilation_h: i32,
        fused_activation: FusedActivation,
    },
    Pool2d {
        padding: Padding,
        stride_w: i32,
        stride_h: i32,
        filter_w: i32,
        filter_h: i32,
        fused_activation: FusedActivation,
    },
    FullyConnected {
        fused_activation: FusedActivation,
        keep_num_dims: bool,
    },
    Softmax {
        beta: f32,
    },
    Reshape {
        new_shape: Vec<i32>,
    },
    Concatenation {
        axis: i32,
        fused_activation: FusedActivation,
    },
    Reducer {
        keep_dims: bool,
    },
    BatchMatMul {
        adj_x: bool,
        adj_y: bool,
    },
}

impl OpOptions {
    /// The fused activation, for option kinds that carry one.
    pub fn fused_activation(&self) -> Option<FusedActivation> {
        match self {
            OpOptions::Add { fused_activation }
            | OpOptions::Sub { fused_activation }
            | OpOptions::Mul { fused_activation }
            | OpOptions::Div { fused_activation }
            | OpOptions::Conv2d {
                fused_activation, ..
            }
            | OpOptions::DepthwiseConv2d {
                fused_activation, ..
            }
            | OpOptions::Pool2d {
                fused_activation, ..
            }
            | OpOptions::FullyConnected {
                fused_activation, ..
            }
            | OpOptions::Concatenation {
                fused_activation, ..
            } => Some(*fused_activation),
            OpOptions::None
            | OpOptions::Softmax { .. }
            | OpOptions::Reshape { .. }
            | OpOptions::Reducer { .. }
            | OpOptions::BatchMatMul { .. } => None,
        }
    }
}
