//! End-to-end render tests over the JSON models in testdata/.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devsite_refdocs::cli::{load_module, run_render, RenderArgs, EXIT_ERROR, EXIT_SUCCESS};
use devsite_refdocs::external::ExternalLocationProvider;
use devsite_refdocs::model::Sid;
use devsite_refdocs::{write_view, DevsiteConfig, Language, RenderPass, SiteView};
use tempfile::TempDir;

fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

/// Answers only for the platform's own classes.
struct PlatformDocs;

impl ExternalLocationProvider for PlatformDocs {
    fn resolve(&self, sid: &Sid) -> Option<String> {
        if sid.package_name.starts_with("kotlin") {
            let class = sid.class_names.as_deref().unwrap_or("package-summary");
            Some(format!(
                "https://kotlinlang.org/api/latest/jvm/stdlib/{}/{}.html",
                sid.package_name, class
            ))
        } else {
            None
        }
    }
}

async fn render() -> Vec<SiteView> {
    let config = DevsiteConfig::parse_file(testdata("devsite.yaml")).unwrap();
    let modules = vec![
        load_module(&testdata("models/java.json")).unwrap(),
        load_module(&testdata("models/kotlin.json")).unwrap(),
    ];
    RenderPass::new(config)
        .unwrap()
        .external_locations(Arc::new(PlatformDocs))
        .run(modules)
        .await
        .unwrap()
}

fn view(views: &[SiteView], language: Language) -> &SiteView {
    views.iter().find(|v| v.language == language).unwrap()
}

#[tokio::test]
async fn test_excluded_package_only_leaves_java_view() {
    let views = render().await;
    assert_eq!(view(&views, Language::Java).package_list, vec!["com.example"]);
    assert_eq!(
        view(&views, Language::Kotlin).package_list,
        vec!["com.example", "com.example.internal"]
    );
}

#[tokio::test]
async fn test_hidden_and_boring_classlikes_are_not_displayed() {
    let views = render().await;
    let kotlin = view(&views, Language::Kotlin);
    let names: Vec<_> = kotlin
        .classlikes
        .iter()
        .map(|c| c.qualified_name.as_str())
        .collect();
    assert!(names.contains(&"com.example.Widget"));
    assert!(names.contains(&"com.example.LegacyAdapter"));
    assert!(!names.contains(&"com.example.Secret"));
    assert!(!names.contains(&"com.example.Widget.Companion"));
}

#[tokio::test]
async fn test_java_view_has_synthetic_class_and_extension() {
    let views = render().await;
    let java = view(&views, Language::Java);

    let utils = java
        .classlikes
        .iter()
        .find(|c| c.name == "WidgetsKt")
        .unwrap();
    assert_eq!(utils.path, "/reference/java/com/example/WidgetsKt.html");
    assert_eq!(utils.functions[0].link.name, "shine");

    let widget = java.classlikes.iter().find(|c| c.name == "Widget").unwrap();
    assert_eq!(widget.extension_functions[0].link.name, "shine");
    assert!(widget.functions.iter().any(|f| f.link.name == "getSize"));
    assert!(widget.properties.is_empty());
}

#[tokio::test]
async fn test_inherited_members_and_links() {
    let views = render().await;
    let kotlin = view(&views, Language::Kotlin);
    let gadget = kotlin.classlikes.iter().find(|c| c.name == "Gadget").unwrap();

    assert_eq!(gadget.functions.len(), 1);
    assert_eq!(gadget.functions[0].link.name, "click");
    assert_eq!(gadget.inherited.len(), 1);
    let spin = &gadget.inherited[0].functions[0];
    assert_eq!(spin.link.url, "/reference/kotlin/com/example/Widget.html#spin(kotlin.Int)");
    assert_eq!(
        spin.parameters[0].type_.url,
        "https://kotlinlang.org/api/latest/jvm/stdlib/kotlin/Int.html"
    );
    assert_eq!(gadget.hierarchy.super_classes[0].name, "Widget");
    assert_eq!(gadget.hierarchy.interfaces[0].name, "Clickable");
    assert_eq!(
        gadget.source_link.as_deref(),
        Some("https://cs.example.com/search?q=file:com/example/Gadget.kt+class:com.example.Gadget")
    );
}

#[tokio::test]
async fn test_enum_entries_link_into_owner() {
    let views = render().await;
    let kotlin = view(&views, Language::Kotlin);
    let color = kotlin.classlikes.iter().find(|c| c.name == "Color").unwrap();
    let urls: Vec<_> = color.enum_entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "/reference/kotlin/com/example/Color.html#RED",
            "/reference/kotlin/com/example/Color.html#GREEN"
        ]
    );
}

#[tokio::test]
async fn test_toc_sections() {
    let views = render().await;
    let kotlin = view(&views, Language::Kotlin);
    let yaml = kotlin.toc.to_yaml().unwrap();
    assert!(yaml.contains("title: Class Index"));
    assert!(yaml.contains("title: example\n"));
    assert!(yaml.contains("title: example.internal"));

    let package = &kotlin.toc.toc[2];
    let sections: Vec<_> = package.section.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(sections, vec!["Interfaces", "Classes", "Enums", "Exceptions"]);
    let classes: Vec<_> = package.section[1]
        .section
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(classes, vec!["Gadget", "LegacyAdapter", "Widget"]);
}

#[tokio::test]
async fn test_write_view_outputs() {
    let views = render().await;
    let out = TempDir::new().unwrap();
    let kotlin = view(&views, Language::Kotlin);
    let summary = write_view(kotlin, out.path()).unwrap();
    assert_eq!(summary.packages, 2);

    let root = out.path().join("reference/kotlin");
    let package_list = fs::read_to_string(root.join("androidx/package-list")).unwrap();
    assert_eq!(package_list, "com.example\ncom.example.internal\n");
    assert!(root.join("androidx/_toc.yaml").is_file());
    assert!(root.join("androidx/classes.json").is_file());
    assert!(root.join("com/example/package-summary.json").is_file());

    let widget: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("com/example/Widget.json")).unwrap())
            .unwrap();
    assert_eq!(widget["kind"], "class");
    assert_eq!(widget["extension_functions"][0]["name"], "shine");
}

#[test]
fn test_cli_render() {
    let out = TempDir::new().unwrap();
    let args = RenderArgs {
        inputs: vec![testdata("models")],
        config: testdata("devsite.yaml"),
        out: out.path().to_path_buf(),
        classpath_model: Some(testdata("classpath.json")),
        verbose: false,
    };
    assert_eq!(run_render(&args).unwrap(), EXIT_SUCCESS);
    assert!(out.path().join("reference/java/com/example/WidgetsKt.json").is_file());
    assert!(!out.path().join("reference/java/com/example/internal").exists());
}

#[test]
fn test_cli_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("devsite.yaml");
    fs::write(&config, "project_path: androidx\n").unwrap();
    let args = RenderArgs {
        inputs: vec![testdata("models")],
        config,
        out: dir.path().join("out"),
        classpath_model: None,
        verbose: false,
    };
    assert_eq!(run_render(&args).unwrap(), EXIT_ERROR);
}
