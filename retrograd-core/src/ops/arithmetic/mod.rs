pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod pow;
pub mod sub;

pub use add::add_op;
pub use div::div_op;
pub use mul::mul_op;
pub use neg::neg_op;
pub use pow::pow_op;
pub use sub::sub_op;

use crate::tensor::Tensor;
use std::ops::{Add, Div, Mul, Neg, Sub};

// Operator sugar over the checked `*_op` functions. The operators panic on
// error; code that wants to handle failures calls the functions directly.

impl Add<&Tensor> for &Tensor {
    type Output = Tensor;
    fn add(self, rhs: &Tensor) -> Tensor {
        add_op(self, rhs).expect("tensor addition failed")
    }
}

impl Sub<&Tensor> for &Tensor {
    type Output = Tensor;
    fn sub(self, rhs: &Tensor) -> Tensor {
        sub_op(self, rhs).expect("tensor subtraction failed")
    }
}

impl Mul<&Tensor> for &Tensor {
    type Output = Tensor;
    fn mul(self, rhs: &Tensor) -> Tensor {
        mul_op(self, rhs).expect("tensor multiplication failed")
    }
}

impl Div<&Tensor> for &Tensor {
    type Output = Tensor;
    fn div(self, rhs: &Tensor) -> Tensor {
        div_op(self, rhs).expect("tensor division failed")
    }
}

impl Neg for &Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        neg_op(self).expect("tensor negation failed")
    }
}
