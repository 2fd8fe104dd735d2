pub const MASKED_EDIT: &str = include_str!("../data/prompts/masked_edit.txt");
pub const VIDEO: &str = include_str!("../data/prompts/video.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim_end().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
