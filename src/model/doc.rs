/// Block tag inside a javadoc comment: `@param name the value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocletTag {
    pub name: String,
    pub value: String,
    pub line_number: usize,
}

impl DocletTag {
    /// Whitespace-separated words of the value
    pub fn parameters(&self) -> Vec<&str> {
        self.value.split_whitespace().collect()
    }
}

/// Javadoc comment with its leading decoration stripped
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocComment {
    pub text: String,
    pub tags: Vec<DocletTag>,
}

impl DocComment {
    /// Parse the raw `/** ... */` text that starts on `line`
    pub fn parse(raw: &str, line: usize) -> Self {
        let body = raw.strip_prefix("/**").unwrap_or(raw);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut text_lines: Vec<&str> = Vec::new();
        let mut tags: Vec<DocletTag> = Vec::new();

        for (i, raw_line) in body.lines().enumerate() {
            let content = strip_decoration(raw_line);
            if let Some(rest) = content.trim_start().strip_prefix('@') {
                let (name, value) = match rest.find(char::is_whitespace) {
                    Some(idx) => (&rest[..idx], rest[idx..].trim()),
                    None => (rest, ""),
                };
                if !name.is_empty() {
                    tags.push(DocletTag {
                        name: name.to_string(),
                        value: value.to_string(),
                        line_number: line + i,
                    });
                    continue;
                }
            }
            match tags.last_mut() {
                Some(tag) => {
                    let content = content.trim();
                    if !content.is_empty() {
                        if !tag.value.is_empty() {
                            tag.value.push(' ');
                        }
                        tag.value.push_str(content);
                    }
                }
                None => text_lines.push(content),
            }
        }

        let text = text_lines.join("\n").trim().to_string();
        Self { text, tags }
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&DocletTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn tags_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocletTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }
}

fn strip_decoration(line: &str) -> &str {
    let trimmed = line.trim_start();
    let without_star = trimmed.trim_start_matches('*');
    without_star.strip_prefix(' ').unwrap_or(without_star).trim_end()
}
