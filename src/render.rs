/// Error type returned by template engines.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Template engine used to produce message text from a named view.
pub trait Renderer {
    /// Renders `template` with `data`; `merge_data` entries are layered on top.
    fn render(
        &self,
        template: &str,
        data: &serde_json::Value,
        merge_data: &serde_json::Value,
    ) -> Result<String, RenderError>;
}
