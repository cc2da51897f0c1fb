use crate::models::ImageRecord;
use axum::{extract::State, http::StatusCode, response::Html};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Photo Capture</title>
</head>
<body>
  <h1>Photo Capture</h1>
  <p><a href="/capture">Capture a photo</a></p>
  <p><a href="/images">Browse saved photos</a></p>
</body>
</html>
"#;

const CAPTURE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Capture</title>
</head>
<body>
  <h1>Capture</h1>
  <video id="preview" autoplay playsinline></video>
  <canvas id="frame" hidden></canvas>
  <p><button id="shoot">Capture</button> <a href="/images">Saved photos</a></p>
  <p id="status"></p>
  <script>
    const video = document.getElementById('preview');
    const status = document.getElementById('status');
    navigator.mediaDevices.getUserMedia({ video: true })
      .then((stream) => { video.srcObject = stream; })
      .catch((err) => { status.textContent = 'Camera unavailable: ' + err.message; });

    document.getElementById('shoot').addEventListener('click', async () => {
      const canvas = document.getElementById('frame');
      canvas.width = video.videoWidth;
      canvas.height = video.videoHeight;
      canvas.getContext('2d').drawImage(video, 0, 0);
      const res = await fetch('/save_image', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ image: canvas.toDataURL('image/jpeg') }),
      });
      const body = await res.json();
      status.textContent = body.success ? 'Saved ' + body.filename : body.message;
    });
  </script>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn capture() -> Html<&'static str> {
    Html(CAPTURE_HTML)
}

/// Rendered twin of `/api/images`; both go through `ImageStore::list`.
pub async fn list_images(
    State(state): State<crate::AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let images = state
        .store
        .list()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")))?;

    let folder = state.store.root().display().to_string();
    Ok(Html(render_gallery(&folder, &images)))
}

fn render_gallery(folder: &str, images: &[ImageRecord]) -> String {
    let mut body = String::new();
    for image in images {
        body.push_str(&format!(
            "  <figure><a href=\"{url}\"><img src=\"{url}\" alt=\"{name}\" loading=\"lazy\" width=\"320\"></a>\
<figcaption>{name}<br>{kb} KB &middot; {time}</figcaption></figure>\n",
            url = escape_html(&image.url),
            name = escape_html(&image.filename),
            kb = image.size_kb,
            time = escape_html(&image.time),
        ));
    }
    if body.is_empty() {
        body.push_str("  <p>No images captured yet. <a href=\"/capture\">Take one</a>.</p>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  \
<title>Saved Photos</title>\n</head>\n<body>\n  <h1>Saved Photos</h1>\n  \
<p>Folder: {}</p>\n{}</body>\n</html>\n",
        escape_html(folder),
        body
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
