use insuretrack_core_types::RequestContext;

/// Span wrapping one command invocation
///
/// Every event logged while it is entered carries the invocation's
/// `request_id` and `trace_id`.
pub fn command_span(ctx: &RequestContext) -> tracing::Span {
    tracing::info_span!(
        "command",
        request_id = ctx.request_id.as_str(),
        trace_id = ctx.trace_id.as_str()
    )
}
