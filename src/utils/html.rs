// src/utils/html.rs

/// Cleans user-authored post and comment bodies before they are stored.
///
/// Whitelist-based: safe markup (<b>, <p>, links) survives, while <script>,
/// <iframe> and event-handler attributes are stripped together with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
