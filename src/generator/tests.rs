#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::{ConfigError, GeneratorConfig, PathType};
use crate::descriptor::{Binding, LoadOptions, Method, Registry, RegistrySource};
use crate::imports::ImportRegistry;
use std::collections::HashSet;

const LIBRARY: &str = include_str!("../../tests/fixtures/library.yaml");
const LIBRARY_PROTO: &str = "acme/library/v1/library.proto";

fn load(yaml: &str) -> Registry {
    let source: RegistrySource = serde_yaml::from_str(yaml).unwrap();
    Registry::from_source(source, &LoadOptions::default()).unwrap()
}

fn library() -> Registry {
    load(LIBRARY)
}

fn method<'a>(reg: &'a Registry, file: &str, name: &str) -> &'a Method {
    reg.lookup_file(file)
        .unwrap()
        .services
        .iter()
        .flat_map(|s| s.methods.iter())
        .find(|m| m.name == name)
        .unwrap()
}

fn binding<'a>(reg: &'a Registry, name: &str, index: usize) -> &'a Binding {
    &method(reg, LIBRARY_PROTO, name).bindings[index]
}

fn filter_for(reg: &Registry, name: &str, index: usize) -> Option<QueryParamFilter> {
    let m = method(reg, LIBRARY_PROTO, name);
    let request = reg.lookup_msg("", &m.request_type).unwrap();
    QueryParamFilter::synthesize(reg, request, &consumed_fields(&m.bindings[index])).unwrap()
}

fn content<'a>(files: &'a [OutputFile], name: &str) -> &'a str {
    &files.iter().find(|f| f.name == name).unwrap().content
}

/// Request {a, b, c}; POST /v1/things/{b} with body a.
const ABC: &str = r#"
files:
  - name: abc.proto
    package: abc
    go_package: example.com/abc;abcpb
    messages:
      - name: Req
        fields:
          - { name: a, type: string }
          - { name: b, type: string }
          - { name: c, type: string }
      - name: OnlyId
        fields:
          - { name: id, type: string }
    services:
      - name: Things
        methods:
          - name: Touch
            input_type: Req
            output_type: Req
            http: { post: "/v1/things/{b}", body: a }
          - name: Get
            input_type: OnlyId
            output_type: Req
            http: { get: "/v1/ids/{id}" }
"#;

#[test]
fn test_consumed_fields() {
    let reg = library();
    let create = consumed_fields(binding(&reg, "create_book", 0));
    assert_eq!(create.body, BodyConsumption::Field(vec!["book".into()]));
    assert_eq!(create.path_params, vec![vec!["shelf".to_string()]]);
    assert_eq!(create.paths().count(), 2);

    let replace = consumed_fields(binding(&reg, "replace_book", 0));
    assert!(replace.is_whole_request());
    assert_eq!(replace.paths().count(), 1);

    let list = consumed_fields(binding(&reg, "list_books", 0));
    assert_eq!(list.body, BodyConsumption::None);
    assert_eq!(
        list.path_params,
        vec![vec!["genre".to_string()], vec!["filter".into(), "author".into()]]
    );
}

#[test]
fn test_enum_path_param_classification() {
    let reg = library();
    let list = binding(&reg, "list_books", 0);
    assert!(has_enum_path_param(list, false));
    assert!(!has_enum_path_param(list, true));

    let search = binding(&reg, "search_books", 0);
    assert!(has_repeated_enum_path_param(search));
    assert!(has_enum_path_param(search, true));
    assert!(!has_enum_path_param(search, false));

    assert!(!has_enum_path_param(binding(&reg, "get_book", 0), false));
}

#[test]
fn test_enum_imports_are_deduplicated_across_methods() {
    let reg = library();
    let file = reg.lookup_file(LIBRARY_PROTO).unwrap();
    let mut imports = ImportRegistry::new();
    let mut seen = HashSet::new();

    let mut found = Vec::new();
    for name in ["list_books", "search_books", "get_book"] {
        found.extend(enum_path_param_imports(
            &reg,
            &mut imports,
            file,
            method(&reg, LIBRARY_PROTO, name),
            &mut seen,
        ));
    }
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "github.com/acme/api/types/v1");
    assert!(seen.contains("github.com/acme/api/types/v1"));
}

#[test]
fn test_enum_imports_skip_the_units_own_package() {
    let yaml = r#"
files:
  - name: a.proto
    package: a
    go_package: example.com/a;apb
    enums:
      - name: Kind
        values: [KIND_UNSPECIFIED, BIG]
    messages:
      - name: Req
        fields:
          - { name: kind, type: enum, type_name: Kind }
    services:
      - name: Svc
        methods:
          - name: Get
            input_type: Req
            output_type: Req
            http: { get: "/v1/{kind}" }
"#;
    let reg = load(yaml);
    let file = &reg.files()[0];
    let found = enum_path_param_imports(
        &reg,
        &mut ImportRegistry::new(),
        file,
        &file.services[0].methods[0],
        &mut HashSet::new(),
    );
    assert!(found.is_empty());
}

#[test]
fn test_enum_imports_respect_already_seen_paths() {
    let reg = library();
    let file = reg.lookup_file(LIBRARY_PROTO).unwrap();
    let mut seen: HashSet<String> = ["github.com/acme/api/types/v1".to_string()].into();
    let found = enum_path_param_imports(
        &reg,
        &mut ImportRegistry::new(),
        file,
        method(&reg, LIBRARY_PROTO, "list_books"),
        &mut seen,
    );
    assert!(found.is_empty());
}

#[test]
fn test_filter_recognizes_exactly_the_free_field() {
    let reg = load(ABC);
    let m = &reg.files()[0].services[0].methods[0];
    let request = reg.lookup_msg("", &m.request_type).unwrap();
    let filter = QueryParamFilter::synthesize(&reg, request, &consumed_fields(&m.bindings[0]))
        .unwrap()
        .unwrap();
    assert_eq!(filter.free_fields(), &[vec!["c".to_string()]]);
    assert!(filter.recognizes(&["c"]));
    assert!(!filter.recognizes(&["a"]));
    assert!(!filter.recognizes(&["b"]));
    assert!(!filter.accepts(&["a"]));
    assert_eq!(
        filter.to_string(),
        r#"&DoubleArray{Encoding: map[string]int{"c": 0}, Base: []int{1, 1, 0}, Check: []int{0, 1, 2}}"#
    );
}

#[test]
fn test_wildcard_body_has_no_query_params() {
    let reg = library();
    assert!(filter_for(&reg, "replace_book", 0).is_none());
}

#[test]
fn test_empty_remainder_has_no_query_params() {
    let reg = load(ABC);
    let m = &reg.files()[0].services[0].methods[1];
    let request = reg.lookup_msg("", &m.request_type).unwrap();
    let consumed = consumed_fields(&m.bindings[0]);
    assert!(free_field_paths(&reg, request, &consumed).unwrap().is_empty());
    assert!(QueryParamFilter::synthesize(&reg, request, &consumed)
        .unwrap()
        .is_none());
}

#[test]
fn test_partially_consumed_message_is_expanded() {
    let reg = library();
    let filter = filter_for(&reg, "list_books", 0).unwrap();
    assert_eq!(
        filter.free_fields(),
        &[
            vec!["filter".to_string(), "year".to_string()],
            vec!["page".to_string()],
        ]
    );
    assert!(filter.accepts(&["filter", "year"]));
    assert!(filter.accepts(&["page", "size"]));
    assert!(!filter.accepts(&["filter", "author"]));
    assert!(!filter.accepts(&["filter"]));
    assert!(!filter.accepts(&["genre"]));
}

#[test]
fn test_unbound_binding_keeps_every_field() {
    let reg = library();
    let filter = filter_for(&reg, "list_books", 1).unwrap();
    let free: Vec<String> = filter.free_fields().iter().map(|p| p.join(".")).collect();
    assert_eq!(free, vec!["genre", "filter", "page"]);
}

#[test]
fn test_generate_skips_units_without_bindings() {
    let reg = library();
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "gateway/library.gm.go",
            "gateway/routes.gm.go",
            "gateway/endpoints.gm.go",
            "gateway/muxkit.gm.go",
        ]
    );
}

#[test]
fn test_generate_service_artifact_order() {
    let reg = library();
    let config = GeneratorConfig {
        generate_service: true,
        ..Default::default()
    };
    let files = generate(&reg, &config).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names[1], "gateway/service.gm.go");
    let service = content(&files, "gateway/service.gm.go");
    assert!(service.contains("type GatewayService interface {\n\tLibraryService\n}"));
    assert!(!service.contains("import ("));
}

#[test]
fn test_unit_handlers_and_contract() {
    let reg = library();
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let unit = content(&files, "gateway/library.gm.go");

    assert!(unit.starts_with("// Code generated by gokitmux-gen. DO NOT EDIT."));
    assert!(unit.contains("// source: acme/library/v1/library.proto"));
    assert!(unit.contains("package gateway"));
    assert!(unit.contains("type LibraryService interface {"));
    assert!(unit.contains(
        "\tPing(context.Context, *libraryv1.GetBookRequest) (*libraryv1.Book, error)"
    ));
    assert!(!unit.contains("type Ping struct{}"));

    assert!(unit.contains("RegisterHandler(&ListBooks{})"));
    assert!(unit.contains("RegisterHandler(&ListBooks_1{})"));
    assert!(unit.contains("type ListBooks_1 struct{}"));
    assert!(unit.contains("\"/v1/genres/{genre}/authors/{filter.author}/books\""));
    assert!(unit.contains("Name:    \"listbooks_1\","));
    assert!(unit.contains("ListBooksHandler := httptransport.NewServer("));

    assert!(unit.contains("var filter_GetBook_0 = &DoubleArray{"));
    assert!(unit.contains("var filter_ListBooks_1 = &DoubleArray{"));
    assert!(!unit.contains("filter_ReplaceBook"));
    assert!(!unit.contains("filter_CreateBook_0 ="));
    assert!(unit.contains("Decode(&protoReq.Book)"));
    assert!(unit.contains("Decode(protoReq); err != nil"));
}

#[test]
fn test_unit_imports_are_grouped_and_unique() {
    let reg = library();
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let unit = content(&files, "gateway/library.gm.go");

    let block_start = unit.find("import (").unwrap();
    let block = &unit[block_start..block_start + unit[block_start..].find(')').unwrap()];
    assert!(block.contains("\t\"context\"\n\t\"io\"\n\t\"net/http\"\n\n"));
    assert_eq!(block.matches("\"github.com/acme/api/types/v1\"").count(), 1);
    assert_eq!(block.matches("\"github.com/acme/api/library/v1\"").count(), 1);
    assert!(block.contains("httptransport \"github.com/go-kit/kit/transport/http\""));
    assert!(block.contains("\"github.com/gorilla/mux\""));
    assert!(block.contains("\"github.com/grpc-ecosystem/grpc-gateway/utilities\""));
    assert!(!block.contains("\"strings\""));

    assert!(unit.contains("ev, err := runtime.Enum(val, typesv1.Genre_value)"));
    assert!(unit.contains("protoReq.Genre = typesv1.Genre(ev)"));
    assert!(unit.contains("runtime.EnumSlice(val, \",\", typesv1.Genre_value)"));
}

#[test]
fn test_package_alias_collisions_get_suffixes() {
    let yaml = r#"
files_to_generate: [a/v1/a.proto]
files:
  - name: b/v1/b.proto
    package: b.v1
    go_package: example.com/b/v1
    messages:
      - name: Req
  - name: a/v1/a.proto
    package: a.v1
    go_package: example.com/a/v1
    messages:
      - name: Resp
    services:
      - name: Svc
        methods:
          - name: Call
            input_type: .b.v1.Req
            output_type: Resp
            http: { post: "/v1/call", body: "*" }
"#;
    let reg = load(yaml);
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let unit = content(&files, "gateway/a.gm.go");
    assert!(unit.contains("\t\"example.com/b/v1\""));
    assert!(unit.contains("\tv1_0 \"example.com/a/v1\""));
    assert!(unit.contains("Call(context.Context, *v1.Req) (*v1_0.Resp, error)"));
    assert!(unit.contains("\t\"io\"\n"));
}

#[test]
fn test_nested_enum_path_param_allocates_parents() {
    let yaml = r#"
files:
  - name: a.proto
    package: a
    go_package: example.com/a;apb
    enums:
      - name: Kind
        values: [KIND_UNSPECIFIED, BIG]
    messages:
      - name: Filter
        fields:
          - { name: kind, type: enum, type_name: Kind }
      - name: Req
        fields:
          - { name: filter, type: message, type_name: Filter }
    services:
      - name: Svc
        methods:
          - name: List
            input_type: Req
            output_type: Req
            http: { get: "/v1/kinds/{filter.kind}" }
"#;
    let reg = load(yaml);
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let unit = content(&files, "gateway/a.gm.go");
    assert!(unit.contains("if protoReq.Filter == nil {"));
    assert!(unit.contains("protoReq.Filter = &apb.Filter{}"));
    assert!(unit.contains("protoReq.Filter.Kind = apb.Kind(ev)"));
    assert!(!unit.contains("PopulateQueryParameters"));
    assert!(!unit.contains("grpc-gateway/utilities"));
}

#[test]
fn test_options_reach_the_templates() {
    let reg = library();
    let config = GeneratorConfig {
        output_path: "github.com/acme/api/gw".into(),
        module: Some("github.com/acme/api".into()),
        metrics: Some("github.com/acme/api/metrics".into()),
        error_encoder: Some("encodeError".into()),
        register_func_suffix: "Server".into(),
        manual_router: true,
        repeated_path_param_separator: crate::config::Separator::Pipes,
        ..Default::default()
    };
    let files = generate(&reg, &config).unwrap();
    let unit = content(&files, "gw/library.gm.go");
    assert!(unit.contains("package gw"));
    assert!(unit.contains("\"github.com/acme/api/metrics\""));
    assert!(unit.contains("return metrics.ForHandler(h, \"GetBook\")"));
    assert!(unit.contains("httptransport.ServerErrorEncoder(encodeError),"));
    assert!(unit.contains("GetBookServer := httptransport.NewServer("));
    assert!(unit.contains("runtime.EnumSlice(val, \"|\", typesv1.Genre_value)"));

    let routes = content(&files, "gw/routes.gm.go");
    assert!(routes.contains("r = ManualRouter(svc, r)"));
}

#[test]
fn test_response_body_selector() {
    let yaml = r#"
files:
  - name: abc.proto
    package: abc
    go_package: example.com/abc;abcpb
    messages:
      - name: Req
        fields:
          - { name: page_token, type: string }
      - name: Resp
        fields:
          - { name: items, type: string, repeated: true }
    services:
      - name: Things
        methods:
          - name: List
            input_type: Req
            output_type: Resp
            http: { get: "/v1/things", response_body: items }
"#;
    let reg = load(yaml);
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    let unit = content(&files, "gateway/abc.gm.go");
    assert!(unit.contains("Encode(response.(*abcpb.Resp).Items)"));
    assert!(unit.contains("var filter_List_0 = &DoubleArray{Encoding: map[string]int{\"page_token\": 0}"));
    assert!(!unit.contains("\"github.com/gorilla/mux\""));
    assert!(!unit.contains("\t\"io\"\n"));
}

#[test]
fn test_run_wide_artifacts() {
    let reg = library();
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();

    let routes = content(&files, "gateway/routes.gm.go");
    assert!(routes.contains("func Router(svc GatewayService) *mux.Router {"));
    assert!(!routes.contains("ManualRouter"));

    let endpoints = content(&files, "gateway/endpoints.gm.go");
    assert!(endpoints.contains("type Endpointer interface {"));
    assert!(endpoints.contains("\"github.com/go-kit/kit/endpoint\""));

    let muxkit = content(&files, "gateway/muxkit.gm.go");
    assert!(muxkit.contains("var Handlers []Endpointer"));
    assert!(muxkit.contains("func FilterQuery(filter *DoubleArray, values url.Values) url.Values {"));
    assert!(muxkit.contains("\t\"net/url\"\n\t\"strings\"\n)"));
}

#[test]
fn test_generation_is_deterministic() {
    let reg = library();
    let config = GeneratorConfig {
        generate_service: true,
        ..Default::default()
    };
    let first = generate(&reg, &config).unwrap();
    let second = generate(&reg, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_config_conflict_fails_before_rendering() {
    let reg = library();
    let config = GeneratorConfig {
        module: Some("github.com/acme/api".into()),
        paths: PathType::SourceRelative,
        ..Default::default()
    };
    let err = generate(&reg, &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ConflictingPathStrategies { .. })
    ));
}

#[test]
fn test_source_relative_unit_paths() {
    let reg = library();
    let config = GeneratorConfig {
        paths: PathType::SourceRelative,
        ..Default::default()
    };
    let files = generate(&reg, &config).unwrap();
    assert_eq!(files[0].name, "acme/library/v1/library.gm.go");
    assert_eq!(files[1].name, "gateway/routes.gm.go");
}

#[test]
fn test_unit_state_machine_skip() {
    let reg = library();
    let config = GeneratorConfig::default();
    let ctx = GenerationContext::new(&reg, &config, config.layout().unwrap());
    let mut assembler = Assembler::new(ctx);
    let admin = reg.lookup_file("acme/admin/v1/admin.proto").unwrap();
    let err = assembler.unit(admin).unwrap_err();
    assert!(err.is_skip());
    assert_eq!(
        err.to_string(),
        "acme/admin/v1/admin.proto: no target service defined in the file"
    );
}

#[test]
fn test_base_imports_keep_their_names() {
    let reg = library();
    let config = GeneratorConfig::default();
    let ctx = GenerationContext::new(&reg, &config, config.layout().unwrap());
    assert_eq!(ctx.base("net/http").unwrap().ident(), "http");
    assert_eq!(
        ctx.base("github.com/go-kit/kit/transport/http").unwrap().ident(),
        "httptransport"
    );
    assert_eq!(ctx.base("github.com/gorilla/mux").unwrap().ident(), "mux");
    assert!(ctx.base("example.com/unknown").is_none());
}

#[test]
fn test_import_set_groups() {
    let mut set = ImportSet::new();
    assert!(set.add(crate::imports::GoPackage::from_path("github.com/gorilla/mux")));
    assert!(set.add(crate::imports::GoPackage::from_path("net/http")));
    assert!(!set.add(crate::imports::GoPackage::from_path("net/http")));
    assert!(set.add(crate::imports::GoPackage::from_path("context")));
    let block = set.into_block();
    let standard: Vec<&str> = block.standard.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(standard, vec!["context", "net/http"]);
    assert_eq!(block.third_party.len(), 1);
    assert!(!block.is_empty());
}

#[test]
fn test_write_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![OutputFile {
        name: "gateway/x.gm.go".into(),
        content: "package gateway\n".into(),
    }];
    let written = write_outputs(dir.path(), &files).unwrap();
    assert_eq!(written, vec![dir.path().join("gateway/x.gm.go")]);
    assert_eq!(
        std::fs::read_to_string(&written[0]).unwrap(),
        "package gateway\n"
    );
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn gofmt_stub(dir: &std::path::Path, exit_code: i32) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let script = dir.join("gofmt");
    let log = dir.join("gofmt.log");
    std::fs::write(
        &script,
        format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit {exit_code}\n", log.display()),
    )
    .unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

#[test]
fn test_format_outputs_runs_the_configured_binary() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let stub = gofmt_stub(dir.path(), 0);
    let target = dir.path().join("x.gm.go");
    std::fs::write(&target, "package x\n").unwrap();

    std::env::set_var("GOKITMUX_GOFMT_BIN", &stub);
    let result = format_outputs(std::slice::from_ref(&target));
    std::env::remove_var("GOKITMUX_GOFMT_BIN");

    result.unwrap();
    let log = std::fs::read_to_string(dir.path().join("gofmt.log")).unwrap();
    assert_eq!(log.trim(), format!("-w {}", target.display()));
}

#[test]
fn test_format_outputs_reports_failure() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let stub = gofmt_stub(dir.path(), 2);

    std::env::set_var("GOKITMUX_GOFMT_BIN", &stub);
    let result = format_outputs(&[dir.path().join("x.gm.go")]);
    std::env::remove_var("GOKITMUX_GOFMT_BIN");

    assert_eq!(result.unwrap_err().to_string(), "gofmt failed");
}

#[test]
fn test_format_outputs_without_files_is_a_no_op() {
    format_outputs(&[]).unwrap();
}

/// Two units in separate packages, each with one bound method.
fn two_units(first: (&str, &str, &str), second: (&str, &str, &str)) -> Registry {
    let unit = |(name, service, method): (&str, &str, &str), pkg: &str| {
        format!(
            r#"
  - name: {name}
    package: {pkg}
    go_package: example.com/{pkg}
    messages:
      - name: Req
        fields:
          - {{ name: id, type: string }}
    services:
      - name: {service}
        methods:
          - name: {method}
            input_type: Req
            output_type: Req
            http: {{ get: "/v1/{pkg}/{{id}}" }}"#
        )
    };
    load(&format!("files:{}{}\n", unit(first, "alpha"), unit(second, "beta")))
}

fn duplicate_output(err: &anyhow::Error) -> (String, String, String) {
    match err.downcast_ref::<GenerateError>() {
        Some(GenerateError::DuplicateOutput { path, first, second }) => {
            (path.clone(), first.clone(), second.clone())
        }
        other => panic!("expected DuplicateOutput, got {other:?}"),
    }
}

fn duplicate_declaration(err: &anyhow::Error) -> (String, String, String) {
    match err.downcast_ref::<GenerateError>() {
        Some(GenerateError::DuplicateDeclaration { name, first, second }) => {
            (name.clone(), first.clone(), second.clone())
        }
        other => panic!("expected DuplicateDeclaration, got {other:?}"),
    }
}

#[test]
fn test_units_sharing_a_basename_fail_the_run() {
    let reg = two_units(
        ("a/v1/books.proto", "Shelves", "ListShelves"),
        ("b/v1/books.proto", "Books", "ListBooks"),
    );
    let err = generate(&reg, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(
        duplicate_output(&err),
        (
            "gateway/books.gm.go".to_string(),
            "a/v1/books.proto".to_string(),
            "b/v1/books.proto".to_string()
        )
    );
    assert_eq!(
        err.to_string(),
        "output path gateway/books.gm.go is produced by both a/v1/books.proto and b/v1/books.proto"
    );
}

#[test]
fn test_source_relative_units_sharing_a_basename_are_distinct() {
    let reg = two_units(
        ("a/v1/books.proto", "Shelves", "ListShelves"),
        ("b/v1/books.proto", "Books", "ListBooks"),
    );
    let config = GeneratorConfig {
        paths: PathType::SourceRelative,
        ..Default::default()
    };
    let files = generate(&reg, &config).unwrap();
    assert_eq!(files[0].name, "a/v1/books.gm.go");
    assert_eq!(files[1].name, "b/v1/books.gm.go");
}

#[test]
fn test_unit_named_like_a_run_wide_artifact_fails_the_run() {
    let reg = two_units(
        ("shelf/v1/routes.proto", "Shelves", "ListShelves"),
        ("book/v1/service.proto", "Books", "ListBooks"),
    );
    let err = generate(&reg, &GeneratorConfig::default()).unwrap_err();
    let (path, first, second) = duplicate_output(&err);
    assert_eq!(path, "gateway/routes.gm.go");
    assert_eq!(first, "the router artifact");
    assert_eq!(second, "shelf/v1/routes.proto");

    // service.gm.go is only reserved when the GatewayService artifact is emitted.
    let reg = two_units(
        ("shelf/v1/shelves.proto", "Shelves", "ListShelves"),
        ("book/v1/service.proto", "Books", "ListBooks"),
    );
    let files = generate(&reg, &GeneratorConfig::default()).unwrap();
    assert!(files.iter().any(|f| f.name == "gateway/service.gm.go"));
    let config = GeneratorConfig {
        generate_service: true,
        ..Default::default()
    };
    let err = generate(&reg, &config).unwrap_err();
    let (path, first, second) = duplicate_output(&err);
    assert_eq!(path, "gateway/service.gm.go");
    assert_eq!(first, "the GatewayService artifact");
    assert_eq!(second, "book/v1/service.proto");
}

#[test]
fn test_contract_named_like_the_runtime_fails_the_run() {
    for service in ["Gateway", "GatewayService"] {
        let reg = two_units(
            ("a/v1/gateway.proto", service, "Ping"),
            ("b/v1/books.proto", "Books", "ListBooks"),
        );
        let config = GeneratorConfig {
            generate_service: true,
            ..Default::default()
        };
        let err = generate(&reg, &config).unwrap_err();
        let (name, first, second) = duplicate_declaration(&err);
        assert_eq!(name, "GatewayService");
        assert_eq!(first, "the generated runtime");
        assert_eq!(second, format!("service alpha.{service}"));
    }
}

#[test]
fn test_handler_named_like_the_runtime_fails_the_run() {
    let reg = two_units(
        ("a/v1/shelves.proto", "Shelves", "Route"),
        ("b/v1/books.proto", "Books", "ListBooks"),
    );
    let err = generate(&reg, &GeneratorConfig::default()).unwrap_err();
    let (name, _, second) = duplicate_declaration(&err);
    assert_eq!(name, "Route");
    assert_eq!(second, "method alpha.Shelves.Route");
}

#[test]
fn test_shared_method_names_across_units_fail_the_run() {
    let reg = two_units(
        ("a/v1/shelves.proto", "Shelves", "Get"),
        ("b/v1/books.proto", "Books", "Get"),
    );
    let err = generate(&reg, &GeneratorConfig::default()).unwrap_err();
    let (name, first, second) = duplicate_declaration(&err);
    assert_eq!(name, "Get");
    assert_eq!(first, "method alpha.Shelves.Get");
    assert_eq!(second, "method beta.Books.Get");
}

#[test]
fn test_shared_method_names_within_a_unit_fail_the_run() {
    let reg = load(
        r#"
files:
  - name: shop.proto
    package: shop
    go_package: example.com/shop
    messages:
      - name: Req
        fields:
          - { name: id, type: string }
    services:
      - name: Carts
        methods:
          - name: Get
            input_type: Req
            output_type: Req
            http: { get: "/v1/carts/{id}" }
      - name: Orders
        methods:
          - name: Get
            input_type: Req
            output_type: Req
            http: { get: "/v1/orders/{id}" }
"#,
    );
    let err = generate(&reg, &GeneratorConfig::default()).unwrap_err();
    let (name, first, second) = duplicate_declaration(&err);
    assert_eq!(name, "Get");
    assert_eq!(first, "method shop.Carts.Get");
    assert_eq!(second, "method shop.Orders.Get");
}

#[test]
fn test_collisions_are_not_skips() {
    let duplicate = GenerateError::DuplicateOutput {
        path: "gateway/books.gm.go".into(),
        first: "a/v1/books.proto".into(),
        second: "b/v1/books.proto".into(),
    };
    assert!(!duplicate.is_skip());
    let declared = GenerateError::DuplicateDeclaration {
        name: "Get".into(),
        first: "method a.Get".into(),
        second: "method b.Get".into(),
    };
    assert!(!declared.is_skip());
}
