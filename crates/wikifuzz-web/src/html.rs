/// Markup contract consumed by the search box controller: an input and an
/// empty ordered list with well-known ids it renders results into.
pub const SEARCH_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Page Search</title>
  <link rel="stylesheet" href="/assets/search.css" />
</head>
<body>
  <div id="fuzzysearch-container">
    <input type="text" id="fuzzysearch-input" class="fuzzysearch-input" placeholder="Search pages..." autocomplete="off" />
    <ul id="fuzzysearch-results" class="fuzzysearch-results"></ul>
  </div>
</body>
</html>
"#;
