use thiserror::Error;

use crate::types::{MaterialSignature, Rect};

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors, surfaced before any packing starts. Pieces that
/// cannot be seated are not errors; they are recorded in the layout's
/// unfit list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no stock sheet configured for material {signature}")]
    MissingStock { signature: MaterialSignature },

    #[error("stock sheet {size} has no area")]
    EmptyStock { size: Rect },

    #[error("edge squaring of {squaring}mm consumes the whole {size} stock sheet")]
    SquaringExceedsStock { squaring: u32, size: Rect },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stock_names_the_signature() {
        let error = Error::MissingStock {
            signature: MaterialSignature {
                thickness: 19,
                color: "Oak".to_string(),
                grained: true,
            },
        };
        assert_eq!(
            error.to_string(),
            "no stock sheet configured for material Oak 19mm"
        );
    }

    #[test]
    fn squaring_error_names_both_values() {
        let error = Error::SquaringExceedsStock {
            squaring: 3000,
            size: Rect::new(2800, 2070),
        };
        assert!(error.to_string().contains("3000mm"));
        assert!(error.to_string().contains("2800x2070"));
    }
}
