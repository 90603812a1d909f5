use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{MaterialSignature, StockSheetSpec};

/// Maps material signatures to the stock sheet they are cut from. A
/// catalog-wide default covers signatures without a dedicated entry.
#[derive(Debug, Clone, Default)]
pub struct StockCatalog {
    entries: BTreeMap<MaterialSignature, StockSheetSpec>,
    default: Option<StockSheetSpec>,
}

impl StockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, spec: StockSheetSpec) -> Self {
        self.default = Some(spec);
        self
    }

    pub fn with_entry(mut self, signature: MaterialSignature, spec: StockSheetSpec) -> Self {
        self.entries.insert(signature, spec);
        self
    }

    pub fn spec_for(&self, signature: &MaterialSignature) -> Result<StockSheetSpec> {
        self.entries
            .get(signature)
            .copied()
            .or(self.default)
            .ok_or_else(|| Error::MissingStock {
                signature: signature.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn white_19() -> MaterialSignature {
        MaterialSignature {
            thickness: 19,
            color: "White".to_string(),
            grained: true,
        }
    }

    #[test]
    fn test_default_covers_unknown_signature() {
        let catalog = StockCatalog::new().with_default(StockSheetSpec {
            size: Rect::new(2800, 2070),
            max_sheets: None,
        });
        let spec = catalog.spec_for(&white_19()).unwrap();
        assert_eq!(spec.size, Rect::new(2800, 2070));
    }

    #[test]
    fn test_entry_beats_default() {
        let catalog = StockCatalog::new()
            .with_default(StockSheetSpec {
                size: Rect::new(2800, 2070),
                max_sheets: None,
            })
            .with_entry(
                white_19(),
                StockSheetSpec {
                    size: Rect::new(2500, 1250),
                    max_sheets: Some(4),
                },
            );
        let spec = catalog.spec_for(&white_19()).unwrap();
        assert_eq!(spec.size, Rect::new(2500, 1250));
        assert_eq!(spec.max_sheets, Some(4));
    }

    #[test]
    fn test_missing_stock_is_an_error() {
        let catalog = StockCatalog::new();
        let err = catalog.spec_for(&white_19()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingStock {
                signature: white_19()
            }
        );
    }
}
