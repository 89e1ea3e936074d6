use crate::errors::{Result, SimError};

/// Positional argument access for whitespace-split input lines.
pub trait ArgsExt {
    fn get_required(&self, index: usize, line: usize) -> Result<&str>;
    fn parse_float_at(&self, index: usize, line: usize) -> Result<f64>;
    fn parse_count_at(&self, index: usize, line: usize) -> Result<usize>;
}

impl ArgsExt for [&str] {
    fn get_required(&self, index: usize, line: usize) -> Result<&str> {
        self.get(index)
            .copied()
            .ok_or(SimError::MissingArgument { line })
    }

    fn parse_float_at(&self, index: usize, line: usize) -> Result<f64> {
        let arg = self.get_required(index, line)?;
        arg.parse().map_err(|e| SimError::FloatParseError {
            string: arg.to_string(),
            source: e,
        })
    }

    fn parse_count_at(&self, index: usize, line: usize) -> Result<usize> {
        let arg = self.get_required(index, line)?;
        let value: i64 = arg.parse().map_err(|e| SimError::IntParseError {
            string: arg.to_string(),
            source: e,
        })?;
        value.try_into().map_err(|_| SimError::InvalidArgument {
            string: arg.to_string(),
            line,
        })
    }
}

/// One-based ids in data files become zero-based bead indices.
pub trait OneBasedIndex {
    fn to_index(self, n_beads: usize) -> Result<usize>;
}

impl OneBasedIndex for usize {
    fn to_index(self, n_beads: usize) -> Result<usize> {
        if self == 0 || self > n_beads {
            return Err(SimError::InvalidBeadIndex {
                index: self,
                n_beads,
            });
        }
        Ok(self - 1)
    }
}
