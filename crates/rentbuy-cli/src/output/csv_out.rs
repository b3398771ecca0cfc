use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Row-shaped series (the monthly cashflow of a model run, or an amortization
/// schedule) are written one record per row; anything else is written as
/// `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result"));
    match result {
        Some(res) => {
            if let Some(rows) = series_rows(res) {
                write_array_csv(&mut wtr, rows);
            } else {
                write_pairs(&mut wtr, res);
            }
        }
        None => write_pairs(&mut wtr, value),
    }

    let _ = wtr.flush();
}

fn series_rows(result: &Value) -> Option<&Vec<Value>> {
    result
        .pointer("/wealthView/monthlyCashflow")
        .or_else(|| result.get("schedule"))
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty())
}

fn write_pairs<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        _ => {
            let _ = wtr.write_record(["value", &format_csv_value(value)]);
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cashflow_series_written_as_rows() {
        let result = json!({
            "wealthView": {
                "monthlyCashflow": [
                    { "month": 1, "buyOutflow": 100, "rentOutflow": 90, "navGap": 10 },
                    { "month": 2, "buyOutflow": 100, "rentOutflow": 90, "navGap": 20 }
                ]
            }
        });
        let rows = series_rows(&result).map(Vec::len);
        assert_eq!(rows, Some(2));

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, series_rows(&result).map(Vec::as_slice).unwrap_or(&[]));
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().is_some_and(|h| h.split(',').any(|c| c == "month")));
    }

    #[test]
    fn test_flat_result_written_as_pairs() {
        let result = json!({ "wealthGap": 1500, "horizonMonths": 360 });
        assert!(series_rows(&result).is_none());

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_pairs(&mut wtr, &result);
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(text.contains("wealthGap,1500"));
    }
}
