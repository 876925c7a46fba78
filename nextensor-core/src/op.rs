use std::fmt::{self, Display};

/// Kinds of tensor operation understood by an execution layer.
///
/// Nothing in this crate executes them; the view algebra on
/// [`TensorMetadata`](crate::TensorMetadata) covers the ones that are pure
/// metadata rewrites (see [`OpType::is_view_op`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Add,
    Sub,
    Mul,
    Div,
    MatMul,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
    Conv2d,
    MaxPool,
    AvgPool,
    Flatten,
    Reshape,
    Transpose,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCategory {
    Arithmetic,
    Activation,
    Pooling,
    Shape,
    Unknown,
}

impl OpType {
    pub const fn category(&self) -> OpCategory {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::MatMul | Self::Conv2d => {
                OpCategory::Arithmetic
            }
            Self::Relu | Self::Sigmoid | Self::Tanh | Self::Softmax => OpCategory::Activation,
            Self::MaxPool | Self::AvgPool => OpCategory::Pooling,
            Self::Flatten | Self::Reshape | Self::Transpose => OpCategory::Shape,
            Self::Unknown => OpCategory::Unknown,
        }
    }

    /// Whether the op only rewrites metadata and never touches element data.
    pub const fn is_view_op(&self) -> bool {
        matches!(self.category(), OpCategory::Shape)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::MatMul => "matmul",
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Softmax => "softmax",
            Self::Conv2d => "conv2d",
            Self::MaxPool => "maxpool",
            Self::AvgPool => "avgpool",
            Self::Flatten => "flatten",
            Self::Reshape => "reshape",
            Self::Transpose => "transpose",
            Self::Unknown => "unknown",
        }
    }
}

impl OpCategory {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Activation => "activation",
            Self::Pooling => "pooling",
            Self::Shape => "shape",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for OpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
