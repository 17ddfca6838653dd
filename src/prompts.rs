pub const CHAT_SYSTEM: &str = include_str!("../data/prompts/chat_system.txt");
pub const IMAGE_LOCATION: &str = include_str!("../data/prompts/image_location.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Prompt sent to the image deployment for a named location.
pub fn location_image(location: &str) -> String {
    render(IMAGE_LOCATION, &[("location", location)])
}
