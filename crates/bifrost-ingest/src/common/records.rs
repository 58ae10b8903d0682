//! Streaming delimited-record decoder
//!
//! Wraps [`csv::Reader`] behind a lazy, single-pass iterator of raw string
//! records. Only one record is held in memory at a time.

use crate::error::{IngestError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::{self, Read};

/// Options controlling how a delimited source is split into records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Field delimiter byte
    pub delimiter: u8,

    /// Treat double quotes as ordinary text instead of field quoting
    ///
    /// Quotes are never stripped in this mode, so `"Kota"` stays `"Kota"`.
    pub lenient_quotes: bool,

    /// Accept records whose field count differs from the first record
    pub variable_arity: bool,

    /// Drop spaces and tabs at the start of every field, before quote detection
    pub trim_leading_space: bool,
}

impl DecodeOptions {
    /// GeoNames postal dumps: tab separated, free text may hold stray quotes
    pub fn tab_separated() -> Self {
        Self {
            delimiter: b'\t',
            lenient_quotes: true,
            variable_arity: false,
            trim_leading_space: false,
        }
    }

    /// Razorpay IFSC dumps: comma separated, trailing columns may be omitted
    pub fn comma_separated() -> Self {
        Self {
            delimiter: b',',
            lenient_quotes: false,
            variable_arity: true,
            trim_leading_space: true,
        }
    }
}

/// One decoded record and the source line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Field at `index`, or the empty string when the record is short
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Lazy sequence of records read from `R`
pub struct Records<R: Read> {
    reader: csv::Reader<LeadingSpace<R>>,
    record: StringRecord,
    done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Line start or just after a delimiter
    Start,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field: closing quote or first half of `""`
    QuoteInQuoted,
}

/// Byte filter that removes blanks opening a field
///
/// Runs ahead of the csv parser so that `a, "b, c"` splits into `a` and
/// `b, c`. Blanks inside quoted fields are kept. Newlines are never
/// removed, which keeps record line numbers intact.
struct LeadingSpace<R> {
    inner: R,
    enabled: bool,
    delimiter: u8,
    quoting: bool,
    state: FieldState,
}

impl<R: Read> LeadingSpace<R> {
    fn new(inner: R, options: &DecodeOptions) -> Self {
        Self {
            inner,
            enabled: options.trim_leading_space,
            delimiter: options.delimiter,
            quoting: !options.lenient_quotes,
            state: FieldState::Start,
        }
    }

    /// Advance the field state over `byte`; false when the byte is dropped
    fn keep(&mut self, byte: u8) -> bool {
        use FieldState::*;

        self.state = match (self.state, byte) {
            (Quoted, b'"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, b'"') => Quoted,
            (_, b) if b == self.delimiter || b == b'\n' || b == b'\r' => Start,
            (Start, b' ' | b'\t') => return false,
            (Start, b'"') if self.quoting => Quoted,
            _ => Unquoted,
        };
        true
    }
}

impl<R: Read> Read for LeadingSpace<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.enabled {
            return self.inner.read(buf);
        }

        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for i in 0..n {
                let byte = buf[i];
                if self.keep(byte) {
                    buf[kept] = byte;
                    kept += 1;
                }
            }

            // Zero would read as end of input
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// Decode `reader` as delimited text
///
/// Every line becomes one record, headers included; callers that expect a
/// header row skip it themselves. Whitespace-only fields are preserved
/// unless `trim_leading_space` is set.
pub fn records<R: Read>(reader: R, options: DecodeOptions) -> Records<R> {
    let reader = LeadingSpace::new(reader, &options);
    let reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quoting(!options.lenient_quotes)
        .flexible(options.variable_arity)
        .has_headers(false)
        .trim(Trim::None)
        .from_reader(reader);

    Records {
        reader,
        record: StringRecord::new(),
        done: false,
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                let line = self.record.position().map_or(0, |pos| pos.line());
                let fields = self.record.iter().map(str::to_string).collect();
                Some(Ok(RawRecord { line, fields }))
            },
            Ok(false) => {
                self.done = true;
                None
            },
            Err(e) => {
                // The reader position is unreliable after a failed record
                self.done = true;
                Some(Err(IngestError::Csv(e)))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn collect(input: &str, options: DecodeOptions) -> Vec<RawRecord> {
        records(input.as_bytes(), options)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_tab_separated_keeps_stray_quotes() {
        let input = "IN\t560095\tKoramangala \"VI\" Bk\t\t13.1077\n";
        let rows = collect(input, DecodeOptions::tab_separated());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 1);
        assert_eq!(
            rows[0].fields,
            vec!["IN", "560095", "Koramangala \"VI\" Bk", "", "13.1077"]
        );
    }

    #[test]
    fn test_whitespace_only_final_field_is_preserved() {
        let rows = collect("IN\t560095\t \n", DecodeOptions::tab_separated());
        assert_eq!(rows[0].fields[2], " ");
    }

    #[test]
    fn test_fixed_arity_rejects_short_rows() {
        let input = "a\tb\tc\nd\te\n";
        let results: Vec<_> = records(input.as_bytes(), DecodeOptions::tab_separated()).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.cause(), "decode_error");
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let input = "a\tb\nc\nd\te\n";
        let mut rows = records(input.as_bytes(), DecodeOptions::tab_separated());

        assert!(rows.next().unwrap().is_ok());
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_comma_separated_variable_arity_and_leading_space() {
        let input = "BANK,IFSC,BRANCH\nAbhyudaya,  ABHY0065001,\"RTGS-HO, Sion\"\nHDFC Bank,HDFC0000123\n";
        let rows = collect(input, DecodeOptions::comma_separated());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].fields, vec!["Abhyudaya", "ABHY0065001", "RTGS-HO, Sion"]);
        assert_eq!(rows[2].fields.len(), 2);
        assert_eq!(rows[2].field(2), "");
        assert_eq!(rows[2].line, 3);
    }

    #[test]
    fn test_leading_space_before_quoted_field() {
        let input = "Abhyudaya,ABHY0065001, \"RTGS-HO, Sion\",MUMBAI\n";
        let rows = collect(input, DecodeOptions::comma_separated());

        assert_eq!(
            rows[0].fields,
            vec!["Abhyudaya", "ABHY0065001", "RTGS-HO, Sion", "MUMBAI"]
        );
    }

    #[test]
    fn test_blanks_inside_quotes_survive_trimming() {
        let input = "a,\t\" x, \"\"y\"\"\",  b\nc, \"multi\n line\"\nd,e\n";
        let rows = collect(input, DecodeOptions::comma_separated());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].fields, vec!["a", " x, \"y\"", "b"]);
        assert_eq!(rows[1].fields, vec!["c", "multi\n line"]);
        assert_eq!(rows[2].fields, vec!["d", "e"]);
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn test_leading_space_filter_survives_one_byte_reads() {
        struct OneByte<'a>(&'a [u8]);

        impl Read for OneByte<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.split_first() {
                    Some((first, rest)) if !buf.is_empty() => {
                        buf[0] = *first;
                        self.0 = rest;
                        Ok(1)
                    },
                    _ => Ok(0),
                }
            }
        }

        let input = b"x,   \"p, q\"\n";
        let rows = records(OneByte(input), DecodeOptions::comma_separated())
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(rows[0].fields, vec!["x", "p, q"]);
    }
}
