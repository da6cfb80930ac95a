// ABOUTME: Standalone Handlebars helpers for text transforms and formatting
// ABOUTME: Currency, date, case, time, selection, and URL helpers plus registration

pub mod child;

use chrono::NaiveDate;
use handlebars::{Context, Handlebars, Helper, Output, RenderContext, RenderError};
use std::sync::Arc;

use crate::builders::{is_truthy, value_to_string};
use crate::registry::MixinCore;

const DEFAULT_DATE_FORMAT: &str = "D MMMM YYYY";
const CURRENCY_SYMBOL: &str = "£";

fn param_string(h: &Helper, index: usize) -> String {
    h.param(index)
        .map(|p| value_to_string(p.value()))
        .unwrap_or_default()
}

/// Currency helper - formats a numeric literal with a currency symbol,
/// collapsing whole numbers and normalizing everything else to two decimal
/// places. Non-numeric input passes through unchanged.
pub fn currency_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = param_string(h, 0);
    match input.trim().parse::<f64>() {
        Ok(amount) if amount.fract() == 0.0 => {
            out.write(&format!("{}{}", CURRENCY_SYMBOL, amount as i64))?;
        }
        Ok(amount) => {
            out.write(&format!("{}{:.2}", CURRENCY_SYMBOL, amount))?;
        }
        Err(_) => out.write(&input)?,
    }
    Ok(())
}

/// Date helper - input is `value|format` split on the pipe, format
/// defaulting to `"D MMMM YYYY"` in moment-style tokens. Unparseable input
/// passes through unchanged.
pub fn date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = param_string(h, 0);
    let (value, format) = match input.split_once('|') {
        Some((value, format)) => (value.trim(), format.trim()),
        None => (input.trim(), DEFAULT_DATE_FORMAT),
    };

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => {
            let formatted = date.format(&moment_to_chrono(format)).to_string();
            out.write(&formatted)?;
        }
        Err(_) => out.write(&input)?,
    }
    Ok(())
}

/// Map moment-style format tokens to chrono's strftime equivalents. Tokens
/// are matched longest-first so `MMMM` is not consumed as four `M`s.
fn moment_to_chrono(format: &str) -> String {
    const TOKENS: &[(&str, &str)] = &[
        ("YYYY", "%Y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("DD", "%d"),
        ("MM", "%m"),
        ("YY", "%y"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("D", "%-d"),
        ("M", "%-m"),
        ("A", "%p"),
    ];

    let mut output = String::with_capacity(format.len());
    let mut rest = format;
    'outer: while !rest.is_empty() {
        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                output.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().unwrap();
        if ch == '%' {
            output.push_str("%%");
        } else {
            output.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }
    output
}

/// Hyphenate helper - lowercases and joins whitespace runs with hyphens.
pub fn hyphenate_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = param_string(h, 0);
    let slug = input
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    out.write(&slug)?;
    Ok(())
}

/// Uppercase helper
pub fn uppercase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    out.write(&param_string(h, 0).to_uppercase())?;
    Ok(())
}

/// Lowercase helper
pub fn lowercase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    out.write(&param_string(h, 0).to_lowercase())?;
    Ok(())
}

/// Selected helper - parses a `field=value` literal and emits an HTML
/// `checked` attribute when the submitted value for that field matches.
pub fn selected_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = param_string(h, 0);
    if let Some((field, expected)) = input.split_once('=') {
        let current = ctx
            .data()
            .get("values")
            .and_then(|values| values.get(field.trim()))
            .map(value_to_string);
        if current.as_deref() == Some(expected.trim()) {
            out.write(" checked=\"checked\"")?;
        }
    }
    Ok(())
}

/// Time helper - replaces literal `12:00am`/`12:00pm` with
/// `midnight`/`midday`, capitalized when the match opens the string.
pub fn time_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = param_string(h, 0);
    let replaced = replace_clock(&replace_clock(&input, "12:00am", "midnight"), "12:00pm", "midday");
    out.write(&replaced)?;
    Ok(())
}

fn replace_clock(input: &str, token: &str, replacement: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(index) = rest.find(token) {
        output.push_str(&rest[..index]);
        if output.is_empty() && index == 0 {
            // Sentence-initial occurrence.
            let mut chars = replacement.chars();
            if let Some(first) = chars.next() {
                output.extend(first.to_uppercase());
                output.push_str(chars.as_str());
            }
        } else {
            output.push_str(replacement);
        }
        rest = &rest[index + token.len()..];
    }
    output.push_str(rest);
    output
}

/// URL helper - resolves a relative link against the render context's
/// `baseUrl`. Absolute paths and full URLs pass through unchanged.
pub fn url_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let path = param_string(h, 0);
    if path.starts_with('/') || path.contains("://") {
        out.write(&path)?;
        return Ok(());
    }
    let base = ctx
        .data()
        .get("baseUrl")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if base.is_empty() {
        out.write(&path)?;
    } else {
        out.write(&format!("{}/{}", base.trim_end_matches('/'), path))?;
    }
    Ok(())
}

/// Register the stateless standalone helpers.
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("currency", Box::new(currency_helper));
    handlebars.register_helper("date", Box::new(date_helper));
    handlebars.register_helper("hyphenate", Box::new(hyphenate_helper));
    handlebars.register_helper("uppercase", Box::new(uppercase_helper));
    handlebars.register_helper("lowercase", Box::new(lowercase_helper));
    handlebars.register_helper("selected", Box::new(selected_helper));
    handlebars.register_helper("time", Box::new(time_helper));
    handlebars.register_helper("url", Box::new(url_helper));
}

/// Register the helpers that need the registry core: the `t` translation
/// helper, the recursion helpers, and one helper per macro name.
pub(crate) fn register_mixin_helpers(handlebars: &mut Handlebars, core: Arc<MixinCore>) {
    child::register(handlebars, core);
}

// Error-marking class emitted by the `error-class` helper, space-prefixed so
// it can sit inside a class attribute.
pub(crate) const ERROR_CLASS: &str = " error";

pub(crate) fn error_marker(errors: Option<&serde_json::Value>, field: &str) -> &'static str {
    let has_error = errors
        .and_then(|e| e.get(field))
        .map(is_truthy)
        .unwrap_or(false);
    if has_error {
        ERROR_CLASS
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_handlebars() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        register_helpers(&mut handlebars);
        handlebars
    }

    #[test]
    fn test_currency_helper() {
        let handlebars = create_test_handlebars();
        let render = |input: &str| {
            handlebars
                .render_template(&format!("{{{{currency \"{}\"}}}}", input), &json!({}))
                .unwrap()
        };
        assert_eq!(render("10"), "£10");
        assert_eq!(render("10.5"), "£10.50");
        assert_eq!(render("10.00"), "£10");
        assert_eq!(render("abc"), "abc");
    }

    #[test]
    fn test_date_helper() {
        let handlebars = create_test_handlebars();
        let result = handlebars
            .render_template("{{date \"2017-03-01|D MMMM YYYY\"}}", &json!({}))
            .unwrap();
        assert_eq!(result, "1 March 2017");

        let result = handlebars
            .render_template("{{date \"2017-03-01|DD/MM/YYYY\"}}", &json!({}))
            .unwrap();
        assert_eq!(result, "01/03/2017");

        let result = handlebars
            .render_template("{{date \"not a date\"}}", &json!({}))
            .unwrap();
        assert_eq!(result, "not a date");
    }

    #[test]
    fn test_moment_token_mapping() {
        assert_eq!(moment_to_chrono("D MMMM YYYY"), "%-d %B %Y");
        assert_eq!(moment_to_chrono("DD-MM-YY"), "%d-%m-%y");
        assert_eq!(moment_to_chrono("MMM D"), "%b %-d");
    }

    #[test]
    fn test_hyphenate_helper() {
        let handlebars = create_test_handlebars();
        let result = handlebars
            .render_template("{{hyphenate \"Some Field Name\"}}", &json!({}))
            .unwrap();
        assert_eq!(result, "some-field-name");
    }

    #[test]
    fn test_case_helpers() {
        let handlebars = create_test_handlebars();
        assert_eq!(
            handlebars
                .render_template("{{uppercase \"abc\"}}", &json!({}))
                .unwrap(),
            "ABC"
        );
        assert_eq!(
            handlebars
                .render_template("{{lowercase \"AbC\"}}", &json!({}))
                .unwrap(),
            "abc"
        );
    }

    #[test]
    fn test_selected_helper() {
        let handlebars = create_test_handlebars();
        let data = json!({"values": {"contact": "phone"}});
        let result = handlebars
            .render_template("{{selected \"contact=phone\"}}", &data)
            .unwrap();
        assert_eq!(result, " checked=\"checked\"");

        let result = handlebars
            .render_template("{{selected \"contact=email\"}}", &data)
            .unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_time_helper() {
        let handlebars = create_test_handlebars();
        let result = handlebars
            .render_template("{{time \"Arrive by 12:00pm today\"}}", &json!({}))
            .unwrap();
        assert!(result.contains("midday"));

        let result = handlebars
            .render_template("{{time \"12:00am\"}}", &json!({}))
            .unwrap();
        assert_eq!(result, "Midnight");
    }

    #[test]
    fn test_url_helper() {
        let handlebars = create_test_handlebars();
        let data = json!({"baseUrl": "/apply/"});
        assert_eq!(
            handlebars.render_template("{{url \"step-2\"}}", &data).unwrap(),
            "/apply/step-2"
        );
        assert_eq!(
            handlebars.render_template("{{url \"/absolute\"}}", &data).unwrap(),
            "/absolute"
        );
        assert_eq!(
            handlebars
                .render_template("{{url \"step-2\"}}", &json!({}))
                .unwrap(),
            "step-2"
        );
    }
}
