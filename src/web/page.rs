use crate::domain::model::{
    Category, Choice, Gender, SchemeDetails, SchemeSource, SchemeType, UploadSummary,
};
use std::fmt::Write;

const TITLE: &str = "SAATHI - File Uploader";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; }
.columns { display: flex; gap: 3rem; }
.column { flex: 1; }
.frame { box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); padding: 1rem 1.5rem; }
.radio { margin-bottom: 10px; }
.multiselect { margin-top: 10px; min-width: 18rem; }
textarea { width: 100%; min-height: 6rem; }
button { background-color: #008CBA; color: white; border: none; padding: 12px 24px; margin: 1rem auto; display: block; border-radius: 10px; }
.notice { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
.notice.success { background: #e6f4ea; color: #1e4620; }
.notice.error { background: #fdecea; color: #611a15; }
pre.json { background: #f6f8fa; padding: 0.75rem; }
"#;

/// What the page shows under the Upload button after an attempt.
#[derive(Debug, Clone)]
pub enum Notice {
    Uploaded(UploadSummary),
    Error(String),
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn radio_group<T: Choice>(out: &mut String, legend: &str, selected: T) {
    let _ = write!(out, "<fieldset class=\"radio\"><legend>{}</legend>", legend);
    for option in T::ALL {
        let value = escape_html(option.as_str());
        let checked = if *option == selected { " checked" } else { "" };
        let _ = write!(
            out,
            "<label><input type=\"radio\" name=\"{field}\" value=\"{value}\"{checked}> {value}</label><br>",
            field = T::FIELD,
        );
    }
    out.push_str("</fieldset>");
}

fn multiselect<T: Choice>(out: &mut String, label: &str, selected: &[T]) {
    let _ = write!(
        out,
        "<label for=\"{field}\">{label}</label><br><select class=\"multiselect\" id=\"{field}\" name=\"{field}\" multiple size=\"{size}\">",
        field = T::FIELD,
        size = T::ALL.len(),
    );
    for option in T::ALL {
        let value = escape_html(option.as_str());
        let chosen = if selected.contains(option) { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{value}\"{chosen}>{value}</option>");
    }
    out.push_str("</select>");
}

fn json_block(out: &mut String, value: &impl serde::Serialize) {
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    let _ = write!(out, "<pre class=\"json\">{}</pre>", escape_html(&json));
}

fn notice_html(out: &mut String, notice: &Notice) {
    match notice {
        Notice::Uploaded(summary) => {
            let _ = write!(
                out,
                "<div class=\"notice success\">File uploaded successfully: {}</div><h3>Summary</h3>",
                escape_html(&summary.filename)
            );
            json_block(out, &summary.data);
            json_block(out, &summary.params);
        }
        Notice::Error(message) => {
            let _ = write!(out, "<div class=\"notice error\">{}</div>", escape_html(message));
        }
    }
}

/// Renders the whole page: the form with `details` pre-selected, and the
/// notice (if any) in the upload column.
pub fn render(details: &SchemeDetails, notice: Option<&Notice>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{TITLE}</title><style>{STYLE}</style></head><body>"
    );
    let _ = write!(
        out,
        "<h1>{TITLE}</h1><p>This app allows you to upload files and associate them with various scheme details.</p>"
    );
    out.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\"><div class=\"columns\">",
    );

    out.push_str("<div class=\"column frame\"><h2>Fill the Scheme Details</h2>");
    radio_group::<Gender>(&mut out, "Select Gender", details.gender);
    multiselect::<Category>(&mut out, "Select Category", &details.category);
    radio_group::<SchemeSource>(&mut out, "Select Scheme Source", details.source);
    multiselect::<SchemeType>(&mut out, "Select Scheme Type", &details.scheme_type);
    let _ = write!(
        out,
        "<p><label for=\"scheme_description\">Scheme Description</label><br><textarea id=\"scheme_description\" name=\"scheme_description\">\n{}</textarea></p>",
        escape_html(&details.description)
    );
    out.push_str("</div>");

    out.push_str("<div class=\"column frame\"><h2>File Upload</h2>");
    out.push_str(
        "<label for=\"file\">Choose a file</label><br><input type=\"file\" id=\"file\" name=\"file\" accept=\".docx,.pdf\">",
    );
    out.push_str("<button type=\"submit\" name=\"upload_button\">Upload</button>");
    if let Some(notice) = notice {
        notice_html(&mut out, notice);
    }
    out.push_str("</div></div></form></body></html>");
    out
}
