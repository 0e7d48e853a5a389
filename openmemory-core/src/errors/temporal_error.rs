/// Bitemporal fact/edge store errors.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("integrity error: validTo ({valid_to}) cannot be before validFrom ({valid_from})")]
    ValidToBeforeValidFrom {
        valid_from: chrono::DateTime<chrono::Utc>,
        valid_to: chrono::DateTime<chrono::Utc>,
    },

    #[error("no active fact for ({subject}, {predicate})")]
    NoActiveFact { subject: String, predicate: String },

    #[error("fact {id} is already closed")]
    AlreadyClosed { id: String },
}
