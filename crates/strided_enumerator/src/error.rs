#[derive(Debug, derive_more::Display, derive_more::IsVariant)]
enum ErrorPayload {
    #[display(
        fmt = "Destination too short: need room for {} elements, but only {} are available",
        required,
        available
    )]
    DestinationTooShort { required: usize, available: usize },
}

#[derive(Debug, thiserror::Error)]
#[error("{payload}")]
pub struct Error {
    payload: ErrorPayload,
}

impl Error {
    pub(crate) fn destination_too_short(required: usize, available: usize) -> Error {
        Error {
            payload: ErrorPayload::DestinationTooShort {
                required,
                available,
            },
        }
    }

    /// Was a copy rejected because the destination could not hold every element of the view?
    pub fn is_destination_too_short(&self) -> bool {
        self.payload.is_destination_too_short()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
