use snafu::Snafu;

pub type CustomResult<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// race clock text that does not follow the expected layout
    #[snafu(display("invalid time '{text}', expected {expected}"))]
    FormatError { text: String, expected: String },

    /// the pooled lap lines ran out before a rider got all of their laps
    #[snafu(display(
        "timing sheet ran out of lap lines for {rider}: needed {needed}, {available} left"
    ))]
    ShortTimingDataError {
        rider: String,
        needed: usize,
        available: usize,
    },

    /// a lap line that can not be turned into a lap record
    #[snafu(display("malformed lap line for {rider} (lap {lap}): '{line}' ({reason})"))]
    MalformedLapLineError {
        rider: String,
        lap: usize,
        line: String,
        reason: String,
    },

    #[snafu(display("no lap records found for rider {rider}"))]
    NoMatchError { rider: String },

    #[snafu(display("missing field {field}: {details}"))]
    MissingFieldError { field: String, details: String },

    #[snafu(display("invalid {kind} '{value}'. available: {available:?}"))]
    InvalidSelectionError {
        kind: String,
        value: String,
        available: Vec<String>,
    },

    #[snafu(display("request to {url} failed: {source}"))]
    RequestError { url: String, source: reqwest::Error },

    #[snafu(display("could not parse response of {url}: {source}"))]
    JsonError {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("could not extract text from {url}: {source}"))]
    PdfError {
        url: String,
        source: pdf_extract::OutputError,
    },
}
