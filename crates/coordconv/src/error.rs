use coordconv_core::ConversionError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{failed} of {total} lines failed to convert")]
    BatchFailed { failed: usize, total: usize },
}
