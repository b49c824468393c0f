use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{CellContent, CellRef, EvalConfig, Sheet};

/// A sheet plus the config it is evaluated with.
///
/// Evaluation borrows the document and never changes it, so the same
/// document can be evaluated again and always gives the same answer.
#[derive(Clone, Debug, Default)]
pub struct Document {
    sheet: Sheet,
    config: EvalConfig,
}

impl Document {
    pub fn new(config: EvalConfig) -> Self {
        Document {
            sheet: Sheet::new(),
            config,
        }
    }

    /// Build a document from (address, content) pairs.
    pub fn from_pairs<I, K, V>(pairs: I, config: EvalConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut doc = Document::new(config);
        for (address, input) in pairs {
            doc.set_cell(address.as_ref(), input.as_ref())?;
        }
        Ok(doc)
    }

    /// Set a cell from input text; a later call for the same address wins.
    pub fn set_cell(&mut self, address: &str, input: &str) -> Result<()> {
        let cell_ref = CellRef::from_str(address.trim())
            .ok_or_else(|| GridcalcError::InvalidAddress(address.to_string()))?;
        self.sheet.insert(cell_ref, CellContent::from_input(input));
        Ok(())
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Run a full evaluation pass.
    pub fn evaluate(&self) -> Result<super::Evaluation> {
        super::evaluate(&self.sheet, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_rejects_bad_addresses() {
        let err = Document::from_pairs([("A1", "1"), ("1A", "2")], EvalConfig::default())
            .unwrap_err();
        assert!(matches!(err, GridcalcError::InvalidAddress(addr) if addr == "1A"));
    }

    #[test]
    fn set_cell_classifies_input() {
        let mut doc = Document::default();
        doc.set_cell("a1", "=B1").unwrap();
        doc.set_cell("B1", "C1").unwrap();
        let a1 = CellRef::new(0, 0);
        let b1 = CellRef::new(1, 0);
        assert_eq!(
            doc.sheet().get(&a1),
            Some(&CellContent::Formula("B1".to_string()))
        );
        assert_eq!(
            doc.sheet().get(&b1),
            Some(&CellContent::Reference(CellRef::new(2, 0)))
        );
    }
}
