//! ChatML rendering for raw completion endpoints

const IM_START: &str = "<|im_start|>";
const IM_END: &str = "<|im_end|>";

/// Render a single user turn followed by the assistant generation prompt
pub(crate) fn render_user_turn(instruction: &str) -> String {
    format!("{IM_START}user\n{instruction}{IM_END}\n{IM_START}assistant\n")
}

/// Remove the echoed prompt from a completion
///
/// Servers that echo return `prompt + continuation`; only the
/// continuation is kept. Text that does not start with the prompt is
/// returned as-is.
pub(crate) fn strip_prompt_echo<'a>(prompt: &str, completion: &'a str) -> &'a str {
    completion.strip_prefix(prompt).unwrap_or(completion)
}
