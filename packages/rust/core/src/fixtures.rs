//! Test fixtures: a fake toolchain and a miniature three.js source tree.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use threejs_docset_shared::{
    BuildOptions, DocsetConfig, DocsetError, Language, Result, VersionRequest, VersionTag,
};

use crate::tools::SourceTools;

/// Records checkouts and build commands instead of running them.
pub(crate) struct FakeTools {
    tags: Vec<String>,
    fail_checkout: bool,
    checkouts: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
}

impl FakeTools {
    pub(crate) fn new(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            fail_checkout: false,
            checkouts: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_checkout(mut self) -> Self {
        self.fail_checkout = true;
        self
    }

    pub(crate) fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().unwrap().clone()
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl SourceTools for FakeTools {
    fn list_tags(&self, _repo: &Path) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn checkout(&self, _repo: &Path, tag: &VersionTag) -> Result<()> {
        if self.fail_checkout {
            return Err(DocsetError::command(
                format!("git checkout {tag}"),
                "exit status: 1",
                "error: pathspec did not match",
            ));
        }
        self.checkouts.lock().unwrap().push(tag.to_string());
        Ok(())
    }

    fn run(&self, _dir: &Path, command: &[String]) -> Result<()> {
        self.commands.lock().unwrap().push(command.join(" "));
        Ok(())
    }
}

/// A fresh empty directory under the system temp dir.
pub(crate) fn temp_root(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docset-{label}-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub(crate) const LIST_JSON: &str = r#"{
    // Navigation for the English docs.
    "en": {
        "Manual": {
            "Getting Started": {
                "Installation": "manual/en/introduction/Installation",
                "Creating a scene": "manual/en/introduction/Creating-a-scene",
            },
        },
        "Reference": {
            "Core": {
                "Object3D": "api/en/core/Object3D",
                "BufferGeometry": "api/en/core/BufferGeometry",
            },
            "Math": {
                "Vector3": "api/en/math/Vector3",
            },
        },
        "Examples": {
            "Controls": {
                "OrbitControls": "examples/en/controls/OrbitControls",
            },
        },
        "Developer Reference": {
            "WebGLRenderer": {
                "WebGLProgram": "api/en/renderers/webgl/WebGLProgram",
            },
        },
    },
    "zh": {
        "手册": {
            "起步": {
                "安装": "manual/zh/introduction/Installation",
            },
        },
    },
}
"#;

pub(crate) const PAGE_JS: &str = "\
prettify.setAttribute( 'src', pathname.substring( 0, pathname.indexOf( 'docs' ) + 4 ) + '/prettify/prettify.js' );
text = text.replace( /\\[example:([\\w\\_]+)\\]/gi, '<a href=\"../examples/#$1\">$1</a>' );
window.location.replace( url );
";

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Lay out `<root>/three.js` as it looks after `npm run build`, plus assets.
pub(crate) fn source_tree(root: &Path) {
    let src = root.join("three.js");
    write(&src.join("build/three.module.js"), "export const REVISION = '160';\n");
    write(&src.join("files/favicon.ico"), "ico");

    let docs = src.join("docs");
    write(&docs.join("list.json"), LIST_JSON);
    write(&docs.join("page.js"), PAGE_JS);
    write(&docs.join("page.css"), "body { margin: 0; }\n");
    write(&docs.join("index.html"), "<html><body>three.js docs</body></html>");

    for lang in ["en", "zh"] {
        write(
            &docs.join(format!("api/{lang}/core/Object3D.html")),
            "<h3>[property:String name]</h3>\n<h3>[method:this add]( [param:Object3D object], ... )</h3>",
        );
        write(
            &docs.join(format!("api/{lang}/core/BufferGeometry.html")),
            "<h3>[method:Object getAttributes]()</h3>\n<h3>[method:BufferAttribute]</h3>",
        );
        write(
            &docs.join(format!("api/{lang}/math/Vector3.html")),
            "<h3>[property:Float x]</h3>",
        );
        write(
            &docs.join(format!("manual/{lang}/introduction/Installation.html")),
            "<h1>Installation</h1>",
        );
        write(
            &docs.join(format!("examples/{lang}/controls/OrbitControls.html")),
            "<h3>[method:undefined update]()</h3>",
        );
    }

    let examples = src.join("examples");
    write(&examples.join("webgl_animation_skinning.html"), "<html></html>");
    write(&examples.join("webgl_camera.html"), "<html></html>");
    write(&examples.join("main.css"), "body {}");
    write(&examples.join("jsm/controls/OrbitControls.js"), "export {};");

    let assets = root.join("assets");
    write(&assets.join("page-add.css"), "#panel { display: none; }\n");
    write(&assets.join("icon.png"), "png");
    write(&assets.join("icon@2x.png"), "png2x");
    write(&assets.join("info.plist"), "<plist></plist>");
}

/// Build options pointing at a fixture root.
pub(crate) fn options(root: &Path, language: Language) -> BuildOptions {
    BuildOptions::new(root, &DocsetConfig::default(), language, VersionRequest::Latest)
}

/// Every path under `dir`, relative and sorted.
pub(crate) fn tree_listing(dir: &Path) -> Vec<String> {
    let mut paths: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            e.path()
                .strip_prefix(dir)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .filter(|p| !p.is_empty())
        .collect();
    paths.sort();
    paths
}
