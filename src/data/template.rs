//! Title templating over plot option values.
//!
//! Templates use `{NAME}` placeholders resolved against a [`PlotOptions`] map,
//! with `{{`/`}}` as literal braces and an optional format spec after a colon:
//! `{NAME:[[fill]align][width][type]}`.

use crate::data::options::{OptionValue, PlotOptions};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownKey(String),
    #[error("malformed template at byte {0}")]
    Malformed(usize),
    #[error("format spec '{spec}' does not apply to the value of '{key}'")]
    IncompatibleSpec { key: String, spec: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Option<char>,
    width: usize,
    ty: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<FormatSpec> {
        let chars: Vec<char> = spec.chars().collect();
        let mut out = FormatSpec {
            fill: ' ',
            ..Default::default()
        };
        let is_align = |c: char| matches!(c, '<' | '>' | '^');
        let mut i = 0;
        if chars.len() >= 2 && is_align(chars[1]) {
            out.fill = chars[0];
            out.align = Some(chars[1]);
            i = 2;
        } else if !chars.is_empty() && is_align(chars[0]) {
            out.align = Some(chars[0]);
            i = 1;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i > start {
            out.width = chars[start..i].iter().collect::<String>().parse().ok()?;
        }
        match chars.len() - i {
            0 => {}
            1 if chars[i].is_ascii_alphabetic() => out.ty = Some(chars[i]),
            _ => return None,
        }
        Some(out)
    }

    fn pad(&self, s: String, default_align: char) -> String {
        let len = s.chars().count();
        if len >= self.width {
            return s;
        }
        let gap = self.width - len;
        let fill = |n: usize| std::iter::repeat(self.fill).take(n).collect::<String>();
        match self.align.unwrap_or(default_align) {
            '>' => fill(gap) + &s,
            '^' => fill(gap / 2) + &s + &fill(gap - gap / 2),
            _ => s + &fill(gap),
        }
    }
}

fn format_value(key: &str, value: &OptionValue, spec: &str) -> Result<String, TemplateError> {
    let incompatible = || TemplateError::IncompatibleSpec {
        key: key.to_string(),
        spec: spec.to_string(),
    };
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let fs = FormatSpec::parse(spec).ok_or_else(incompatible)?;
    match (value, fs.ty) {
        (OptionValue::Text(s), None | Some('s')) => Ok(fs.pad(s.clone(), '<')),
        (OptionValue::Bool(b), None) => Ok(fs.pad(b.to_string(), '<')),
        (OptionValue::Bool(b), Some('d')) => Ok(fs.pad(u8::from(*b).to_string(), '>')),
        _ => Err(incompatible()),
    }
}

/// Expand every placeholder in `template`.
pub fn render(template: &str, values: &PlotOptions) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template.char_indices().peekable();
    while let Some((pos, c)) = rest.next() {
        match c {
            '{' => {
                if let Some((_, '{')) = rest.peek() {
                    rest.next();
                    out.push('{');
                    continue;
                }
                let mut field = String::new();
                let mut closed = false;
                for (_, fc) in rest.by_ref() {
                    if fc == '}' {
                        closed = true;
                        break;
                    }
                    if fc == '{' {
                        return Err(TemplateError::Malformed(pos));
                    }
                    field.push(fc);
                }
                if !closed {
                    return Err(TemplateError::Malformed(pos));
                }
                let (key, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                if key.is_empty() {
                    return Err(TemplateError::Malformed(pos));
                }
                let value = values
                    .value(key)
                    .ok_or_else(|| TemplateError::UnknownKey(key.to_string()))?;
                out.push_str(&format_value(key, value, spec)?);
            }
            '}' => {
                if let Some((_, '}')) = rest.peek() {
                    rest.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::Malformed(pos));
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Expand `template`, returning it unchanged if expansion fails.
pub fn render_or_raw(template: &str, values: &PlotOptions) -> String {
    match render(template, values) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("template '{}' left unformatted: {}", template, e);
            template.to_string()
        }
    }
}
