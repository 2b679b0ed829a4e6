use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// A tensor value: an integer shape vector and flat row-major `f64` data.
///
/// Tensors are semantically immutable; arithmetic produces new tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    /// The dimension sizes.
    pub shape: Vec<i64>,
    /// The elements, flattened in row-major order.
    pub data:  Vec<f64>,
}

impl Tensor {
    /// Builds a tensor from the evaluated shape and data operands of a tensor
    /// literal.
    ///
    /// The shape must be an array of integers and the data an array of
    /// numbers; integer elements are widened to floats. The data length is
    /// not checked against the shape product.
    ///
    /// # Errors
    /// [`RuntimeError::TensorShapeNotIntegers`] or
    /// [`RuntimeError::TensorDataNotNumbers`] when an operand has the wrong
    /// shape.
    pub fn from_values(shape: &Value, data: &Value) -> Result<Self, RuntimeError> {
        let Value::Array(shape_elements) = shape else {
            return Err(RuntimeError::TensorShapeNotIntegers);
        };
        let shape = shape_elements.borrow()
                                  .iter()
                                  .map(|element| match element {
                                      Value::Integer(v) => Ok(*v),
                                      _ => Err(RuntimeError::TensorShapeNotIntegers),
                                  })
                                  .collect::<Result<Vec<_>, _>>()?;

        let Value::Array(data_elements) = data else {
            return Err(RuntimeError::TensorDataNotNumbers);
        };
        #[allow(clippy::cast_precision_loss)]
        let data = data_elements.borrow()
                                .iter()
                                .map(|element| match element {
                                    Value::Float(v) => Ok(*v),
                                    Value::Integer(v) => Ok(*v as f64),
                                    _ => Err(RuntimeError::TensorDataNotNumbers),
                                })
                                .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { shape, data })
    }

    /// Element-wise addition. The only tensor operation that validates
    /// shapes.
    ///
    /// # Errors
    /// [`RuntimeError::ShapeMismatch`] when the shapes differ.
    pub fn add(&self, rhs: &Self) -> Result<Self, RuntimeError> {
        if self.shape != rhs.shape {
            return Err(RuntimeError::ShapeMismatch { left:  self.shape.clone(),
                                                     right: rhs.shape.clone(), });
        }

        Ok(self.zip_with(rhs, |l, r| l + r))
    }

    /// Element-wise subtraction. Shapes are not validated; the result is
    /// truncated to the shorter operand.
    #[must_use]
    pub fn sub(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |l, r| l - r)
    }

    /// Element-wise multiplication. Shapes are not validated.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |l, r| l * r)
    }

    /// Element-wise division. Shapes are not validated.
    #[must_use]
    pub fn div(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |l, r| l / r)
    }

    /// Pairs the data of both operands and keeps the left shape.
    fn zip_with(&self, rhs: &Self, op: impl Fn(f64, f64) -> f64) -> Self {
        let data = self.data
                       .iter()
                       .zip(&rhs.data)
                       .map(|(l, r)| op(*l, *r))
                       .collect();
        Self { shape: self.shape.clone(),
               data }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.shape
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
        let data = self.data
                       .iter()
                       .map(ToString::to_string)
                       .collect::<Vec<_>>()
                       .join(", ");
        write!(f, "@[{shape}], [{data}]")
    }
}
