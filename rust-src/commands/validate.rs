//! Validate command - decode both payloads without drawing.

use anyhow::Result;

use crate::data::{PayloadInputs, PayloadSet};
use crate::models::{DecodeError, Series, SeriesKind};


/// Status line for one payload.
fn describe(kind: SeriesKind, result: &Result<Series, DecodeError>) -> String {
    match result {
        Ok(series) => format!("{}: ok ({} points)", kind, series.len()),
        Err(err) => format!("{}: invalid ({})", kind, err),
    }
}


/// Run the validate command.
pub fn run(inputs: &PayloadInputs) -> Result<()> {
    let PayloadSet { mint, sales } = inputs.load();
    let mut invalid = 0;

    for (kind, payload) in [(SeriesKind::Mint, mint), (SeriesKind::Sales, sales)] {
        let result = payload.and_then(|text| Series::decode(&text));

        if result.is_err() {
            invalid += 1;
        }
        println!("{}", describe(kind, &result));
    }

    if invalid > 0 {
        anyhow::bail!("{} payload(s) invalid", invalid);
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let ok = Series::decode(r#"{"labels": ["2024-01-01"], "data": [10]}"#);
        assert_eq!(describe(SeriesKind::Sales, &ok), "sales: ok (1 points)");

        let bad = Series::decode(r#"{"labels": ["a","b"], "data": [1,2,3]}"#);
        assert_eq!(
            describe(SeriesKind::Sales, &bad),
            "sales: invalid (length mismatch: 2 labels but 3 data points)"
        );
    }
}
