/// Failures reported by [`decode`](crate::decode).
///
/// The decoder never returns a partial sample: any error aborts the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("buffer of {len} bytes is shorter than the {min}-byte minimum")]
    InsufficientBuffer { len: usize, min: usize },
    #[error("derived field `{field}` is not a finite number")]
    MalformedNumeric { field: &'static str },
}
