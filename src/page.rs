// page.rs
use axum::response::Html;

const STATUS_PLACEHOLDER: &str = "{{status}}";

const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Lights</title>
    <style>
        body { font-family: sans-serif; text-align: center; padding: 10px; background: #222; color: #fff; }
        .card { background: #333; padding: 20px; border-radius: 15px; max-width: 400px; margin: auto; }
        button { padding: 15px; width: 45%; margin: 5px; font-size: 16px; border: none; border-radius: 8px; cursor: pointer; color: #fff; }
        .on { background-color: #4caf50; }
        .off { background-color: #f44336; }
        label { display: block; margin-top: 15px; font-weight: bold; }
        input[type=range] { width: 100%; margin: 10px 0; }
        input[type=color] { border: none; width: 100%; height: 50px; cursor: pointer; border-radius: 8px; }
    </style>
</head>
<body>
    <div class="card">
        <h2>Lights</h2>
        <p>Status: <span style="color:#aaa">{{status}}</span></p>

        <form action="/toggle" method="post">
            <button name="state" value="on" class="on">ON</button>
            <button name="state" value="off" class="off">OFF</button>
        </form>

        <form action="/brightness" method="post">
            <label>Brightness</label>
            <input type="range" min="1" max="100" name="level" onchange="this.form.submit()">
        </form>

        <form action="/color" method="post">
            <label>Color</label>
            <input type="color" name="hex_color" value="#ffffff" onchange="this.form.submit()">
        </form>

        <form action="/temperature" method="post">
            <label>White temperature (warm to cool)</label>
            <input type="range" min="2500" max="6500" step="100" name="temp" onchange="this.form.submit()">
        </form>
    </div>
</body>
</html>
"##;

pub fn render(status: &str) -> Html<String> {
    Html(PAGE.replace(STATUS_PLACEHOLDER, &escape(status)))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
