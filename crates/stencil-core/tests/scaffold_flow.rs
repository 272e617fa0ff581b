//! End-to-end pipeline scenarios over real temp directories, with every
//! external collaborator faked.

use flate2::write::GzEncoder;
use flate2::Compression;
use stencil_core::scaffold::{create_app, scaffold_with_fallback, Capabilities, ScaffoldRequest};
use stencil_core::testing::{FixedProbe, ScriptedPrompter, ScriptedRunner, StaticFetcher};
use stencil_core::{
    CommandOutcome, FailureKind, PackageManager, ScaffoldConfig, ScaffoldError, TemplateSource,
};

fn request(dir: &tempfile::TempDir, pm: PackageManager) -> ScaffoldRequest {
    ScaffoldRequest {
        target: dir.path().join("my-app"),
        package_manager: pm,
    }
}

fn template_archive() -> Vec<u8> {
    let entries = [
        ("dapp-template-main/gitignore", "node_modules\n"),
        ("dapp-template-main/README-template.md", "# remote readme\n"),
        ("dapp-template-main/frontend/src/index.tsx", "export {};\n"),
    ];
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[tokio::test]
async fn fresh_directory_scaffolds_from_builtin_template() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let report = create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.app_name, "my-app");
    assert!(report.is_online);

    let manifest = std::fs::read_to_string(req.target.join("frontend/package.json")).unwrap();
    assert!(manifest.contains("\"name\": \"my-app\""));

    // template landed with rename rules applied
    assert!(req.target.join(".gitignore").is_file());
    assert!(req.target.join("README.md").is_file());
    assert!(req.target.join("frontend/src/App.tsx").is_file());
    assert!(!req.target.join("gitignore").exists());

    // one install call: runtime deps; the empty dev set is skipped
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "yarn");
    assert_eq!(calls[0].args[..2], ["add".to_string(), "--exact".to_string()]);
    assert!(calls[0].args.iter().any(|a| a == "react@^18"));
    assert_eq!(calls[0].cwd, req.target.join("frontend"));
}

#[tokio::test]
async fn conflicting_file_aborts_before_any_side_effect() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    std::fs::create_dir_all(&req.target).unwrap();
    std::fs::write(req.target.join("notes.txt"), "keep me\n").unwrap();

    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(true);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let err = create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap_err();

    match err {
        ScaffoldError::DirectoryNotEmpty { conflicts, .. } => {
            assert_eq!(conflicts, vec!["notes.txt".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(!req.target.join("frontend").exists());
    assert!(!req.target.join("frontend/package.json").exists());
    assert!(runner.calls().is_empty());
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test]
async fn invalid_name_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let req = ScaffoldRequest {
        target: dir.path().join("My App"),
        package_manager: PackageManager::Yarn,
    };
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let err = create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap_err();

    match err {
        ScaffoldError::NameInvalid { problems, .. } => assert!(!problems.is_empty()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!req.target.exists());
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn remote_success_never_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(true);
    let prompter = ScriptedPrompter::accepting();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    scaffold_with_fallback(&req, &caps, &prompter, &ScaffoldConfig::default())
        .await
        .unwrap();

    assert_eq!(prompter.prompts(), 0);
    assert_eq!(fetcher.fetches(), 1);
    assert_eq!(
        std::fs::read_to_string(req.target.join("README.md")).unwrap(),
        "# remote readme\n"
    );
}

#[tokio::test]
async fn download_failure_with_accepted_fallback_reruns_with_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let prompter = ScriptedPrompter::accepting();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let report = scaffold_with_fallback(&req, &caps, &prompter, &ScaffoldConfig::default())
        .await
        .unwrap();

    assert_eq!(report.app_name, "my-app");
    assert_eq!(prompter.prompts(), 1);
    assert_eq!(fetcher.fetches(), 1);
    // both attempts ran the install step
    assert_eq!(runner.calls().len(), 2);
    // builtin template from the second attempt
    assert!(req.target.join(".gitignore").is_file());
    assert!(req.target.join("frontend/src/App.tsx").is_file());
}

#[tokio::test]
async fn download_failure_with_declined_fallback_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let prompter = ScriptedPrompter::declining();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let err = scaffold_with_fallback(&req, &caps, &prompter, &ScaffoldConfig::default())
        .await
        .unwrap_err();

    assert!(err.is_download());
    assert_eq!(prompter.prompts(), 1);
}

#[tokio::test]
async fn fatal_install_failure_never_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::with_outcomes(vec![CommandOutcome {
        exit_code: 1,
        failure: FailureKind::Other,
    }]);
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(true);
    let prompter = ScriptedPrompter::accepting();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let err = scaffold_with_fallback(&req, &caps, &prompter, &ScaffoldConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::Install { .. }));
    assert_eq!(prompter.prompts(), 0);
    // the pipeline never reached the template step
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test]
async fn installer_download_failure_is_also_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    // first attempt: registry fetch fails; fallback attempt: installs fine
    let runner = ScriptedRunner::with_outcomes(vec![CommandOutcome {
        exit_code: 1,
        failure: FailureKind::Download,
    }]);
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(true);
    let prompter = ScriptedPrompter::accepting();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let report = scaffold_with_fallback(&req, &caps, &prompter, &ScaffoldConfig::default())
        .await
        .unwrap();

    assert_eq!(prompter.prompts(), 1);
    assert_eq!(report.app_name, "my-app");
}

#[tokio::test]
async fn offline_yarn_installs_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(false);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let report = create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap();

    assert!(!report.is_online);
    let calls = runner.calls();
    assert!(calls[0].args.iter().any(|a| a == "--offline"));
}

#[tokio::test]
async fn npm_skips_the_probe_and_assumes_online() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Npm);
    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::ok(template_archive());
    let probe = FixedProbe::new(false);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let report = create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap();

    assert!(report.is_online);
    assert_eq!(probe.calls(), 0);
    let calls = runner.calls();
    assert_eq!(calls[0].program, "npm");
    assert_eq!(
        calls[0].args[..2],
        ["install".to_string(), "--save-exact".to_string()]
    );
}

#[tokio::test]
async fn lockfile_of_the_chosen_manager_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Pnpm);
    std::fs::create_dir_all(&req.target).unwrap();
    std::fs::write(req.target.join("pnpm-lock.yaml"), "").unwrap();
    std::fs::write(req.target.join("LICENSE"), "MIT\n").unwrap();

    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    create_app(
        &req,
        &TemplateSource::Builtin,
        &caps,
        &ScaffoldConfig::default(),
    )
    .await
    .unwrap();

    assert!(req.target.join("frontend/package.json").is_file());
}

#[tokio::test]
async fn custom_config_tightens_naming() {
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir, PackageManager::Yarn);
    let config = ScaffoldConfig::parse_toml(
        r#"
[naming]
max_length = 3
"#,
    )
    .unwrap();

    let runner = ScriptedRunner::always_ok();
    let fetcher = StaticFetcher::unreachable();
    let probe = FixedProbe::new(true);
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let err = create_app(&req, &TemplateSource::Builtin, &caps, &config)
        .await
        .unwrap_err();
    match err {
        ScaffoldError::NameInvalid { problems, .. } => {
            assert!(problems.iter().any(|p| p.contains("3 characters")));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!req.target.exists());
}
