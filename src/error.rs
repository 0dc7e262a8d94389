use std::fmt;
use failure::Fail;

/// A collection of errors found in a single validation pass, so that every
/// problem with an input can be reported at once.
#[derive(Debug)]
pub struct ErrorList<E: Fail> {
    pub errs: Vec<E>,
}

impl<E: Fail> ErrorList<E> {
    pub fn from_vec(errs: Vec<E>) -> Result<(), ErrorList<E>> {
        if errs.is_empty() {
            Ok(())
        } else {
            Err(ErrorList { errs })
        }
    }
}

impl<E: Fail> fmt::Display for ErrorList<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, e) in self.errs.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl<E: Fail> Fail for ErrorList<E> {}
