//! Brand-to-logo selection
//!
//! Labels carry the organization logo of the line of business that shipped
//! the original order. The mapping is an explicit table rather than a
//! magic-constant comparison, with a deliberate fallback for ids the table
//! does not know.

/// Line-of-business id of the legacy brand.
pub const LEGACY_LOB_ID: i64 = 19816;

/// Which logo artwork a label carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoVariant {
    /// Current brand mark
    Modern,
    /// Legacy brand mark, still used by the original line of business
    Legacy,
}

impl LogoVariant {
    /// Asset file name the provider resolves this variant to.
    pub fn asset_name(self) -> &'static str {
        match self {
            LogoVariant::Modern => "modern-logo.png",
            LogoVariant::Legacy => "legacy-logo.png",
        }
    }
}

/// Enumerated lob-id to logo-variant lookup.
///
/// Unknown and absent ids resolve to the fallback variant (Modern): every
/// line of business added after the legacy one uses the current mark.
#[derive(Debug, Clone)]
pub struct BrandTable {
    entries: Vec<(i64, LogoVariant)>,
    fallback: LogoVariant,
}

impl BrandTable {
    pub fn standard() -> Self {
        Self {
            entries: vec![(LEGACY_LOB_ID, LogoVariant::Legacy)],
            fallback: LogoVariant::Modern,
        }
    }

    pub fn variant_for(&self, lob_id: Option<i64>) -> LogoVariant {
        lob_id
            .and_then(|id| {
                self.entries
                    .iter()
                    .find(|(known, _)| *known == id)
                    .map(|(_, v)| *v)
            })
            .unwrap_or(self.fallback)
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_id_selects_legacy_variant() {
        let table = BrandTable::standard();
        assert_eq!(table.variant_for(Some(19816)), LogoVariant::Legacy);
    }

    #[test]
    fn test_other_ids_select_modern_variant() {
        let table = BrandTable::standard();
        assert_eq!(table.variant_for(Some(19817)), LogoVariant::Modern);
        assert_eq!(table.variant_for(Some(1)), LogoVariant::Modern);
        assert_eq!(table.variant_for(None), LogoVariant::Modern);
    }
}
