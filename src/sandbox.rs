//! The draw routine contract.
//!
//! A dweet sees exactly seven bindings, in this order: `t`, the canvas `c`,
//! its 2D context `x`, and the shorthands `R`, `C`, `S`, `T`.

use crate::color;
use crate::error::DweetResult;

pub type ColorFn = fn(f64, f64, f64, Option<f64>) -> String;
pub type TrigFn = fn(f64) -> f64;

/// Arguments for one invocation of a draw routine.
pub struct DrawArgs<'a, C: ?Sized, X: ?Sized> {
    /// Virtual time in seconds.
    pub t: f64,
    pub c: &'a C,
    pub x: &'a X,
    /// `R`
    pub color: ColorFn,
    /// `C`
    pub cos: TrigFn,
    /// `S`
    pub sin: TrigFn,
    /// `T`
    pub tan: TrigFn,
}

impl<'a, C: ?Sized, X: ?Sized> DrawArgs<'a, C, X> {
    pub fn new(t: f64, c: &'a C, x: &'a X) -> Self {
        Self {
            t,
            c,
            x,
            color: color::rgba,
            cos: f64::cos,
            sin: f64::sin,
            tan: f64::tan,
        }
    }
}

/// A compiled dweet. Errors are fatal to the animation running it.
pub trait DrawRoutine<C: ?Sized, X: ?Sized> {
    fn draw(&mut self, args: &DrawArgs<'_, C, X>) -> DweetResult<()>;
}

impl<C: ?Sized, X: ?Sized, F> DrawRoutine<C, X> for F
where
    F: FnMut(&DrawArgs<'_, C, X>) -> DweetResult<()>,
{
    fn draw(&mut self, args: &DrawArgs<'_, C, X>) -> DweetResult<()> {
        self(args)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::DweetError;

    #[test]
    fn closures_see_the_shorthands() {
        let surface = RefCell::new(Vec::<String>::new());
        let mut routine = |a: &DrawArgs<'_, RefCell<Vec<String>>, ()>| -> DweetResult<()> {
            let shade = 255.0 * (a.sin)(a.t).abs();
            a.c.borrow_mut().push((a.color)(shade, (a.cos)(0.0), (a.tan)(0.0), None));
            Ok(())
        };
        routine.draw(&DrawArgs::new(0.0, &surface, &())).unwrap();
        assert_eq!(surface.borrow().as_slice(), ["rgba(0,1,0,1)"]);
    }

    #[test]
    fn errors_propagate() {
        let mut routine = |_: &DrawArgs<'_, (), ()>| -> DweetResult<()> {
            Err(DweetError::runtime("x is not defined"))
        };
        let err = routine.draw(&DrawArgs::new(1.0, &(), &())).unwrap_err();
        assert_eq!(err, DweetError::runtime("x is not defined"));
    }
}
