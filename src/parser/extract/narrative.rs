/// Patient name: tokens of the start line before the hospital number.
/// Without a purely numeric token the name stays empty.
pub fn patient_name(start_line: &str) -> String {
    let tokens: Vec<&str> = start_line.split_whitespace().collect();
    match tokens.iter().position(|t| t.chars().all(char::is_numeric)) {
        Some(idx) => tokens[..idx].join(" "),
        None => String::new(),
    }
}

pub fn plan_text(line: &str) -> Option<String> {
    line.strip_prefix("Plan:").map(|rest| rest.trim().to_string())
}
