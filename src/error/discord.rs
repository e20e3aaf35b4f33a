use thiserror::Error;

/// Failure of an outbound call to the Discord HTTP API.
#[derive(Error, Debug)]
pub enum DiscordApiError {
    /// The addressed resource does not exist (HTTP 404).
    #[error("{0} was not found")]
    NotFound(String),

    /// Discord answered with a non-success status other than 404.
    #[error("Discord rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Transport or client error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Serenity(#[from] Box<serenity::Error>),

    /// A payload could not be converted to or from its wire format.
    #[error("Failed to convert Discord payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<serenity::Error> for DiscordApiError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(response)) =
            &err
        {
            let status = response.status_code.as_u16();
            if status == 404 {
                return DiscordApiError::NotFound(response.url.to_string());
            }
            return DiscordApiError::Rejected {
                status,
                message: response.error.message.clone(),
            };
        }

        DiscordApiError::Serenity(Box::new(err))
    }
}
