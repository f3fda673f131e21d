//! Code 128 barcode encoding
//!
//! Encodes a string to the bar/space module sequence of a Code 128 symbol
//! (start code, data, checksum, stop). The paginated-document renderer
//! draws the modules directly; the printer-command target delegates to the
//! printer's native Code 128 field and only needs the validation here.
//!
//! Code set B covers the full printable-ASCII range the SKU fields use;
//! an input that is all digits with even length uses the denser code set C.

use crate::error::{LabelError, LabelResult};

/// Bar/space width patterns for symbols 0..=105, six widths each.
/// Index 106 is the stop pattern (seven widths, 13 modules).
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

const START_B: u32 = 104;
const START_C: u32 = 105;
const STOP: usize = 106;

/// Modules of one encoded symbol: `true` is a bar, `false` a space.
pub type Modules = Vec<bool>;

/// Encode `data` as Code 128 modules.
///
/// Fails on empty input and on characters outside printable ASCII; the
/// caller reports the offending SKU.
pub fn encode(data: &str) -> LabelResult<Modules> {
    if data.is_empty() {
        return Err(LabelError::Encoding {
            sku: data.to_string(),
            reason: "empty content".to_string(),
        });
    }

    let symbols = if data.len() >= 2 && data.len() % 2 == 0 && data.bytes().all(|b| b.is_ascii_digit())
    {
        encode_set_c(data)
    } else {
        encode_set_b(data)?
    };

    let checksum = checksum(&symbols);

    let mut modules = Vec::with_capacity((symbols.len() + 2) * 11 + 13);
    for sym in symbols.iter().chain(std::iter::once(&checksum)) {
        push_pattern(&mut modules, PATTERNS[*sym as usize]);
    }
    push_pattern(&mut modules, PATTERNS[STOP]);
    Ok(modules)
}

fn encode_set_b(data: &str) -> LabelResult<Vec<u32>> {
    let mut symbols = vec![START_B];
    for ch in data.chars() {
        let code = ch as u32;
        if !(0x20..=0x7e).contains(&code) {
            return Err(LabelError::Encoding {
                sku: data.to_string(),
                reason: format!("character {:?} is not encodable", ch),
            });
        }
        symbols.push(code - 0x20);
    }
    Ok(symbols)
}

fn encode_set_c(data: &str) -> Vec<u32> {
    let mut symbols = vec![START_C];
    let bytes = data.as_bytes();
    for pair in bytes.chunks_exact(2) {
        symbols.push(((pair[0] - b'0') as u32) * 10 + (pair[1] - b'0') as u32);
    }
    symbols
}

/// Weighted modulo-103 symbol check: start value plus each data symbol
/// times its position.
fn checksum(symbols: &[u32]) -> u32 {
    let mut sum = symbols[0];
    for (i, sym) in symbols.iter().enumerate().skip(1) {
        sum += sym * i as u32;
    }
    sum % 103
}

fn push_pattern(modules: &mut Modules, pattern: &str) {
    let mut bar = true;
    for width in pattern.bytes() {
        let width = (width - b'0') as usize;
        for _ in 0..width {
            modules.push(bar);
        }
        bar = !bar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_non_ascii() {
        assert!(encode("").is_err());
        assert!(encode("SKÜ").is_err());
    }

    #[test]
    fn test_module_count_set_b() {
        // start + n data + checksum symbols at 11 modules, stop at 13
        let modules = encode("IVM-100").unwrap();
        assert_eq!(modules.len(), (1 + 7 + 1) * 11 + 13);
        // A symbol starts with a bar and the stop pattern ends with one.
        assert!(modules[0]);
        assert!(*modules.last().unwrap());
    }

    #[test]
    fn test_even_digit_input_uses_set_c() {
        // Four digits pack into two set-C symbols instead of four set-B ones.
        let digits = encode("1234").unwrap();
        assert_eq!(digits.len(), (1 + 2 + 1) * 11 + 13);
        let mixed = encode("12A4").unwrap();
        assert_eq!(mixed.len(), (1 + 4 + 1) * 11 + 13);
    }

    #[test]
    fn test_every_symbol_spans_eleven_modules() {
        for pattern in &PATTERNS[..106] {
            let total: usize = pattern.bytes().map(|b| (b - b'0') as usize).sum();
            assert_eq!(total, 11);
        }
        let stop: usize = PATTERNS[STOP].bytes().map(|b| (b - b'0') as usize).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode("ABC-123").unwrap(), encode("ABC-123").unwrap());
    }
}
