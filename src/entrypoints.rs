//! Deterministic framework and entry-point detection.
//!
//! Pattern matching over well-known filenames; no retrieval or model
//! calls involved. "Where is the entry point?"-class questions are
//! answered from this report directly.

use std::path::Path;

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointReport {
    pub framework: String,
    pub entry_files: Vec<String>,
    pub run_commands: Vec<String>,
    pub notes: Vec<String>,
}

impl EntryPointReport {
    /// Plain-text rendering used as a question answer.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![format!("Framework: {}", self.framework)];

        lines.push("Entry files:".to_string());
        if self.entry_files.is_empty() {
            lines.push("- (none detected)".to_string());
        } else {
            for f in &self.entry_files {
                lines.push(format!("- {f}"));
            }
        }

        if !self.run_commands.is_empty() {
            lines.push("Run commands:".to_string());
            for cmd in &self.run_commands {
                lines.push(format!("- {cmd}"));
            }
        }

        if !self.notes.is_empty() {
            lines.push("Notes:".to_string());
            for n in &self.notes {
                lines.push(format!("- {n}"));
            }
        }

        lines.join("\n")
    }
}

fn exists(repo_root: &Path, rel: &str) -> bool {
    repo_root.join(rel).exists()
}

fn read_json(repo_root: &Path, rel: &str) -> Option<Value> {
    let data = std::fs::read_to_string(repo_root.join(rel)).ok()?;
    serde_json::from_str(&data).ok()
}

/// Detect the framework and its entry files for a repository root.
#[must_use]
pub fn detect(repo_root: &Path) -> EntryPointReport {
    if exists(repo_root, "package.json")
        && (exists(repo_root, "next.config.js")
            || exists(repo_root, "next.config.ts")
            || exists(repo_root, "app"))
    {
        return detect_nextjs(repo_root);
    }

    if exists(repo_root, "requirements.txt")
        || exists(repo_root, "pyproject.toml")
        || exists(repo_root, "setup.py")
    {
        return detect_python(repo_root);
    }

    EntryPointReport {
        framework: "Unknown".to_string(),
        notes: vec![
            "Could not detect framework reliably. More detectors (React/Vite, Spring, Django) are a possible extension.".to_string(),
        ],
        ..Default::default()
    }
}

fn detect_nextjs(repo_root: &Path) -> EntryPointReport {
    let app_router = exists(repo_root, "app/layout.tsx") || exists(repo_root, "app/layout.jsx");
    let pages_router = exists(repo_root, "pages/index.tsx")
        || exists(repo_root, "pages/index.jsx")
        || exists(repo_root, "pages/_app.tsx");

    let mut report = EntryPointReport {
        framework: "Next.js".to_string(),
        ..Default::default()
    };

    if let Some(pkg) = read_json(repo_root, "package.json") {
        if let Some(scripts) = pkg.get("scripts").and_then(Value::as_object) {
            for key in ["dev", "build", "start"] {
                if let Some(cmd) = scripts.get(key).and_then(Value::as_str) {
                    report.run_commands.push(format!("npm run {key}  (runs: {cmd})"));
                }
            }
        }
    }

    if app_router {
        report.notes.push(
            "Detected Next.js App Router (`app/` directory). Root route is `app/page.*` and root layout is `app/layout.*`."
                .to_string(),
        );
        for p in ["app/layout.tsx", "app/layout.jsx", "app/page.tsx", "app/page.jsx"] {
            if exists(repo_root, p) {
                report.entry_files.push(p.to_string());
            }
        }
    }

    if pages_router {
        report.notes.push(
            "Detected Next.js Pages Router (`pages/` directory). Root route is `pages/index.*` and app wrapper is `pages/_app.*`."
                .to_string(),
        );
        for p in [
            "pages/_app.tsx",
            "pages/_app.jsx",
            "pages/index.tsx",
            "pages/index.jsx",
        ] {
            if exists(repo_root, p) {
                report.entry_files.push(p.to_string());
            }
        }
    }

    if report.entry_files.is_empty() && exists(repo_root, "next.config.ts") {
        report.notes.push(
            "Found `next.config.*` but no clear `app/` or `pages/` router entry files were detected."
                .to_string(),
        );
    }

    report
}

fn detect_python(repo_root: &Path) -> EntryPointReport {
    let mut entry_files = Vec::new();
    for name in ["main.py", "app.py", "server.py", "run.py", "wsgi.py", "asgi.py"] {
        if exists(repo_root, name) {
            entry_files.push(name.to_string());
        }
    }

    let notes = if entry_files.is_empty() {
        vec![
            "No common Python entrypoint filenames found. Entry may be inside a package or configured via pyproject/cli."
                .to_string(),
        ]
    } else {
        vec!["Detected common Python entrypoint filenames.".to_string()]
    };

    EntryPointReport {
        framework: "Python (generic)".to_string(),
        entry_files,
        run_commands: Vec::new(),
        notes,
    }
}
