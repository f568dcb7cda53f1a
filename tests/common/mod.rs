#![allow(dead_code)]

pub mod fixtures {
    /// Library + admin descriptor document shared by the integration tests.
    pub const LIBRARY: &str = include_str!("../fixtures/library.yaml");

    /// gRPC API configuration binding the admin service's only method.
    pub const ADMIN_HTTP_RULES: &str = r#"
type: google.api.Service
config_version: 3
http:
  rules:
    - selector: acme.admin.v1.Admin.Reindex
      post: /v1/admin/reindex
      body: "*"
"#;
}

pub mod temp_files {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A scratch directory removed on drop.
    pub struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        pub fn new() -> Self {
            Workspace {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Write `content` to `name` below the workspace, creating parents.
        pub fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
            path
        }

        /// Write the library descriptor as `api.yaml`.
        pub fn library(&self) -> PathBuf {
            self.write("api.yaml", super::fixtures::LIBRARY)
        }

        pub fn read(&self, name: &str) -> String {
            std::fs::read_to_string(self.dir.path().join(name)).unwrap()
        }
    }
}

pub mod gofmt {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// A stand-in gofmt that records its arguments in `<dir>/gofmt.log`.
    pub fn stub(dir: &Path) -> PathBuf {
        let script = dir.join("gofmt");
        let log = dir.join("gofmt.log");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit 0\n", log.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();
        script
    }
}
