//! Server-rendered HTML for the classification form

use html_escape::{encode_double_quoted_attribute, encode_text};

/// What to show under the form.
pub enum FormOutcome<'a> {
    Empty,
    Label(&'a str),
    Error(&'a str),
}

/// Render the form page with the previous input filled back in.
pub fn render_page(
    locales: &[String],
    selected_locale: &str,
    measurement: &str,
    outcome: FormOutcome<'_>,
) -> String {
    let options: String = locales
        .iter()
        .map(|locale| {
            let selected = if locale == selected_locale {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{value}"{selected}>{text}</option>"#,
                value = encode_double_quoted_attribute(locale),
                text = encode_text(locale),
            )
        })
        .collect();

    let result = match outcome {
        FormOutcome::Empty => String::new(),
        FormOutcome::Label(label) => {
            format!(r#"<p class="result">{}</p>"#, encode_text(label))
        }
        FormOutcome::Error(message) => {
            format!(r#"<p class="error">{}</p>"#, encode_text(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>spoonfit</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, sans-serif; max-width: 32rem; margin: 3rem auto; padding: 0 1rem; }}
        label {{ display: block; margin-top: 1rem; }}
        input, select, button {{ font-size: 1rem; padding: 0.4rem; margin-top: 0.3rem; }}
        .result {{ font-size: 1.3rem; font-weight: 600; }}
        .error {{ color: #b00020; }}
    </style>
</head>
<body>
    <h1>Spoon size</h1>
    <form method="post" action="/">
        <label for="measurement">Diameter (mm)</label>
        <input id="measurement" name="measurement" type="text" inputmode="decimal" value="{measurement}" required>
        <label for="locale">Language</label>
        <select id="locale" name="locale">{options}</select>
        <button type="submit">Classify</button>
    </form>
    {result}
</body>
</html>
"#,
        measurement = encode_double_quoted_attribute(measurement),
        options = options,
        result = result,
    )
}
