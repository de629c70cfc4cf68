// rest_api/src/form.rs
//
// The intake form, rendered from the schema: a numeric input for age, a
// select per enum field, Yes/No radios per boolean field. Submission posts
// the collected values as JSON to /api/v1/records; the page also shows the
// current dataset and a CSV download link. Presentation only, no state.

use models::{FieldKind, SCHEMA};

fn render_control(out: &mut String, name: &str, label: &str, kind: &FieldKind) {
    out.push_str("<div class=\"field\">");
    match kind {
        FieldKind::Age => {
            out.push_str(&format!(
                "<label for=\"{name}\">{label}</label>\
                 <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" value=\"30\">"
            ));
        }
        FieldKind::Enum(values) => {
            out.push_str(&format!("<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">"));
            for value in *values {
                out.push_str(&format!("<option value=\"{value}\">{value}</option>"));
            }
            out.push_str("</select>");
        }
        FieldKind::Bool => {
            out.push_str(&format!(
                "<span class=\"label\">{label}</span>\
                 <label><input type=\"radio\" name=\"{name}\" value=\"No\" checked> No</label>\
                 <label><input type=\"radio\" name=\"{name}\" value=\"Yes\"> Yes</label>"
            ));
        }
    }
    out.push_str("</div>");
}

/// Renders the full intake page.
pub fn render_form() -> String {
    let mut controls = String::new();
    for field in SCHEMA {
        render_control(&mut controls, field.name, field.label, &field.kind);
    }
    let columns: Vec<String> = SCHEMA.iter().map(|f| format!("\"{}\"", f.name)).collect();
    let columns = columns.join(",");

    // The embedded script contains `"#` sequences (id selectors), so the
    // template needs the longer raw-string delimiter.
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Clinical Data Collection</title>
<style>
body {{ font-family: sans-serif; max-width: 64rem; margin: 2rem auto; }}
.field {{ margin: 0.4rem 0; }}
.field > label:first-child, .field > .label {{ display: inline-block; width: 16rem; }}
table {{ border-collapse: collapse; margin-top: 1rem; }}
th, td {{ border: 1px solid #999; padding: 0.2rem 0.5rem; font-size: 0.85rem; }}
#notice {{ margin: 0.6rem 0; font-weight: bold; }}
</style>
</head>
<body>
<h1>Clinical Data Collection</h1>
<p>Enter patient data for antimicrobial resistance research.</p>
<form id="intake">
{controls}
<button type="submit">Submit Patient Data</button>
</form>
<div id="notice"></div>
<h2>Current Dataset</h2>
<p><a href="/api/v1/records/export">Download Data as CSV</a></p>
<table id="dataset"><thead></thead><tbody></tbody></table>
<script>
const COLUMNS = [{columns}];
const form = document.getElementById("intake");
const notice = document.getElementById("notice");

function collect() {{
  const data = new FormData(form);
  const body = {{}};
  for (const name of COLUMNS) {{
    const value = data.get(name);
    if (value !== null && value !== "") {{
      body[name] = name === "age" ? Number(value) : value;
    }}
  }}
  return body;
}}

async function refresh() {{
  const response = await fetch("/api/v1/records");
  if (!response.ok) return;
  const payload = await response.json();
  const head = document.querySelector("#dataset thead");
  const body = document.querySelector("#dataset tbody");
  head.innerHTML = "<tr>" + COLUMNS.map(c => `<th>${{c}}</th>`).join("") + "</tr>";
  body.innerHTML = payload.records.map(record =>
    "<tr>" + COLUMNS.map(c => `<td>${{record[c]}}</td>`).join("") + "</tr>"
  ).join("");
}}

form.addEventListener("submit", async (event) => {{
  event.preventDefault();
  const response = await fetch("/api/v1/records", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify(collect()),
  }});
  const payload = await response.json();
  if (response.ok) {{
    notice.textContent = "Patient data successfully saved.";
    await refresh();
  }} else if (payload.fields) {{
    notice.textContent = "Invalid fields: " +
      payload.fields.map(f => f.field).join(", ");
  }} else {{
    notice.textContent = "Failed to save data: " + payload.message;
  }}
}});

refresh();
</script>
</body>
</html>
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_renders_one_control_per_schema_field() {
        let html = render_form();
        for field in SCHEMA {
            assert!(html.contains(&format!("name=\"{}\"", field.name)), "{}", field.name);
            assert!(html.contains(field.label), "{}", field.label);
        }
    }

    #[test]
    fn enum_controls_list_every_allowed_value() {
        let html = render_form();
        for value in ["E. coli", "Klebsiella spp.", "Healthcare-associated", "UTI"] {
            assert!(html.contains(&format!("<option value=\"{value}\">")));
        }
    }

    #[test]
    fn age_control_enforces_the_lower_bound() {
        assert!(render_form().contains("type=\"number\" id=\"age\" name=\"age\" min=\"0\""));
    }

    #[test]
    fn script_keeps_its_id_selectors_intact() {
        let html = render_form();
        assert!(html.contains("document.querySelector(\"#dataset thead\")"));
        assert!(html.contains("document.querySelector(\"#dataset tbody\")"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
