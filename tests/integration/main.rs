//! Integration tests for mvnbox

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's global and project config
    fn mvnbox(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("mvnbox");
        cmd.env("MVNBOX_CONFIG", config_dir.path().join("config.toml"))
            .env_remove("RUST_LOG")
            .arg("--no-local");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Maven builds"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mvnbox"));
    }

    #[test]
    fn status_runs() {
        // No engine may be installed here; only check it doesn't panic
        let temp = TempDir::new().unwrap();
        let _ = mvnbox(&temp).arg("status").assert();
    }

    #[test]
    fn config_path_follows_env() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                temp.path().join("config.toml").display().to_string(),
            ));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[image]"))
            .stdout(predicate::str::contains("maven-m2"))
            .stdout(predicate::str::contains("/root/.m2"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .args(["config", "set", "cache.volume", "team-m2"])
            .assert()
            .success();

        mvnbox(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("team-m2"));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_file_is_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[image]\ndigest = \"latest\"\n",
        )
        .unwrap();

        mvnbox(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("image.digest"));
    }

    #[test]
    fn completions_bash() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mvnbox"));
    }

    #[test]
    fn package_missing_sources_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-project");
        mvnbox(&temp)
            .args(["package", "-s"])
            .arg(&missing)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Source directory not found"));
    }

    /// PATH pointing at a directory that holds no engine binaries
    fn without_engines(cmd: &mut Command, temp: &TempDir) {
        cmd.env("PATH", temp.path().join("empty-bin"));
    }

    #[test]
    fn configured_engine_missing_from_path() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[runtime]\nengine = \"podman\"\n",
        )
        .unwrap();

        let mut cmd = mvnbox(&temp);
        without_engines(&mut cmd, &temp);
        cmd.args(["package", "-s"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Podman is not usable"))
            .stderr(predicate::str::contains("'podman' is not on PATH"));
    }

    #[test]
    fn auto_engine_with_nothing_installed() {
        let temp = TempDir::new().unwrap();

        let mut cmd = mvnbox(&temp);
        without_engines(&mut cmd, &temp);
        cmd.args(["package", "-s"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No container engine found"))
            .stderr(predicate::str::contains("Install Podman"));
    }

    #[test]
    fn exec_requires_command() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp).arg("exec").assert().failure();
    }

    #[test]
    fn unknown_subcommand_fails() {
        let temp = TempDir::new().unwrap();
        mvnbox(&temp).arg("deploy-to-prod").assert().failure();
    }
}
