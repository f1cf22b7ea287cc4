mod common;

use common::{Call, FakeBuilder, FakeCloud, Failure, config, new_log, steps_called};
use shipflow_cloud::HostingAction;
use shipflow_config::{AwsSettings, ProjectSettings};
use shipflow_core::{
    BUCKET_IN_USE, DbEngine, DeploymentError, DeploymentPipeline, PipelineObserver, Step,
    UNSUPPORTED_DATABASE, resolve_deployment,
};
use std::sync::Mutex;

/// All seven steps run, in order, and the accumulated fields are filled in
#[tokio::test]
async fn test_full_run_in_order() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let deployed = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap();

    assert_eq!(steps_called(&calls), Step::ALL.to_vec());
    assert_eq!(deployed.war_key(), Some("store-20240101000000.war"));
    assert_eq!(
        deployed.db_url(),
        Some("jdbc:mysql://db.example.internal:5432/storedb")
    );

    let log = calls.lock().unwrap();
    assert_eq!(
        log[0],
        Call::Build {
            tool: shipflow_build::BuildTool::Maven,
            profile: "prod".into(),
            war: true,
        }
    );
}

/// PostgreSQL is created as "postgres" and resolved as "postgresql"
#[tokio::test]
async fn test_postgres_engine_translation() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let settings = ProjectSettings {
        prod_database_type: Some("postgresql".into()),
        ..Default::default()
    };
    let mut cfg = resolve_deployment(&settings).unwrap();
    let filled = config(DbEngine::Postgres);
    cfg.application_name = filled.application_name;
    cfg.environment_name = filled.environment_name;
    cfg.bucket_name = filled.bucket_name;
    cfg.instance_type = filled.instance_type;
    cfg.db_instance_class = filled.db_instance_class;
    cfg.aws_region = filled.aws_region;
    cfg.db_name = filled.db_name;
    cfg.db_username = filled.db_username;
    cfg.db_password = filled.db_password;

    let deployed = DeploymentPipeline::new(&cloud, &builder)
        .run(cfg)
        .await
        .unwrap();

    let log = calls.lock().unwrap();
    let created = log
        .iter()
        .find_map(|c| match c {
            Call::CreateDatabase(req) => Some(req.engine.clone()),
            _ => None,
        })
        .unwrap();
    let resolved = log
        .iter()
        .find_map(|c| match c {
            Call::ResolveUrl { engine, .. } => Some(engine.clone()),
            _ => None,
        })
        .unwrap();

    assert_eq!(created, "postgres");
    assert_eq!(resolved, "postgresql");
    assert!(deployed.db_url().unwrap().starts_with("jdbc:postgresql://"));
}

/// Non-PostgreSQL engines use the same name for creation and resolution
#[tokio::test]
async fn test_engine_unchanged_for_mysql_and_mariadb() {
    for engine in [DbEngine::MySql, DbEngine::MariaDb] {
        let calls = new_log();
        let cloud = FakeCloud::new(calls.clone());
        let builder = FakeBuilder {
            calls: calls.clone(),
            fail: false,
        };

        DeploymentPipeline::new(&cloud, &builder)
            .run(config(engine))
            .await
            .unwrap();

        let log = calls.lock().unwrap();
        let names: Vec<String> = log
            .iter()
            .filter_map(|c| match c {
                Call::CreateDatabase(req) => Some(req.engine.clone()),
                Call::ResolveUrl { engine, .. } => Some(engine.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec![engine.creation_name(), engine.creation_name()]);
    }
}

/// A failing step stops the run and is named in the error
#[tokio::test]
async fn test_halt_on_each_failing_step() {
    let provider_steps = [
        Step::CreateBucket,
        Step::UploadArtifact,
        Step::CreateDatabase,
        Step::ResolveDatabaseUrl,
        Step::VerifyRoles,
        Step::CreateOrUpdateApplication,
    ];

    for failing in provider_steps {
        let calls = new_log();
        let cloud = FakeCloud::failing_at(
            calls.clone(),
            failing,
            Failure::Message(format!("{} exploded", failing)),
        );
        let builder = FakeBuilder {
            calls: calls.clone(),
            fail: false,
        };

        let err = DeploymentPipeline::new(&cloud, &builder)
            .run(config(DbEngine::MySql))
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(failing));
        assert_eq!(err.to_string(), format!("{} exploded", failing));

        let called = steps_called(&calls);
        assert_eq!(called.last(), Some(&failing));
        let expected: Vec<Step> = Step::ALL
            .iter()
            .copied()
            .take_while(|s| *s != failing)
            .chain(std::iter::once(failing))
            .collect();
        assert_eq!(called, expected);
    }
}

/// A failed build stops everything before the first cloud call
#[tokio::test]
async fn test_build_failure() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: true,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert!(matches!(err, DeploymentError::Build { .. }));
    assert_eq!(err.step(), Some(Step::Build));
    assert!(err.to_string().contains("status 1"));
    assert_eq!(steps_called(&calls), vec![Step::Build]);
}

/// Bucket creation without a provider message reports the bucket-in-use text
#[tokio::test]
async fn test_bucket_error_without_message() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(calls.clone(), Step::CreateBucket, Failure::NoMessage);
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), BUCKET_IN_USE);
    assert_eq!(steps_called(&calls), vec![Step::Build, Step::CreateBucket]);
}

#[tokio::test]
async fn test_bucket_error_empty_message() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(
        calls.clone(),
        Step::CreateBucket,
        Failure::Message(String::new()),
    );
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), BUCKET_IN_USE);
}

#[tokio::test]
async fn test_bucket_error_with_message_is_verbatim() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(
        calls.clone(),
        Step::CreateBucket,
        Failure::Message("AccessDenied: Access Denied".into()),
    );
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "AccessDenied: Access Denied");
}

/// Surrounding whitespace in a provider message is kept as reported
#[tokio::test]
async fn test_bucket_error_message_keeps_whitespace() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(
        calls.clone(),
        Step::CreateBucket,
        Failure::Message(" Bucket name already taken\n".into()),
    );
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), " Bucket name already taken\n");
}

/// The bucket remap does not leak into other steps
#[tokio::test]
async fn test_missing_message_elsewhere_is_not_remapped() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(calls.clone(), Step::CreateDatabase, Failure::NoMessage);
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap_err();

    assert_ne!(err.to_string(), BUCKET_IN_USE);
    assert_eq!(err.step(), Some(Step::CreateDatabase));
}

/// Unsupported database technology: configuration error, zero collaborator calls
#[tokio::test]
async fn test_unsupported_database_makes_no_calls() {
    let settings = ProjectSettings {
        prod_database_type: Some("oracle".into()),
        ..Default::default()
    };

    let err = resolve_deployment(&settings).unwrap_err();
    assert_eq!(err, DeploymentError::configuration(UNSUPPORTED_DATABASE));
    assert_eq!(err.step(), None);
}

/// An incomplete configuration is rejected before the build
#[tokio::test]
async fn test_invalid_config_makes_no_calls() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let mut cfg = config(DbEngine::MySql);
    cfg.db_password.clear();

    let err = DeploymentPipeline::new(&cloud, &builder)
        .run(cfg)
        .await
        .unwrap_err();

    assert!(matches!(err, DeploymentError::Configuration(_)));
    assert!(calls.lock().unwrap().is_empty());
}

/// Existing project: saved fields are used and hosting runs in update mode
#[tokio::test]
async fn test_existing_project_updates_application() {
    let settings = ProjectSettings {
        prod_database_type: Some("MariaDB".into()),
        aws: Some(AwsSettings {
            application_name: "shop".into(),
            environment_name: "shop-prod".into(),
            bucket_name: "shop-artifacts".into(),
            instance_type: "t3.medium".into(),
            aws_region: "us-west-2".into(),
            db_name: "shopdb".into(),
            db_instance_class: "db.t3.small".into(),
        }),
        ..Default::default()
    };

    let mut cfg = resolve_deployment(&settings).unwrap();
    assert!(cfg.existing_project);
    cfg.db_username = "shop".into();
    cfg.db_password = "another-secret".into();

    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    DeploymentPipeline::new(&cloud, &builder)
        .run(cfg)
        .await
        .unwrap();

    let log = calls.lock().unwrap();
    assert_eq!(log[1], Call::CreateBucket("shop-artifacts".into()));

    let request = match log.last().unwrap() {
        Call::Hosting(req) => req.clone(),
        other => panic!("unexpected last call: {:?}", other),
    };
    assert_eq!(request.action, HostingAction::Update);
    assert_eq!(request.application_name, "shop");
    assert_eq!(request.environment_name, "shop-prod");
    assert_eq!(request.bucket_name, "shop-artifacts");
    assert_eq!(request.war_key, "store-20240101000000.war");
    assert_eq!(request.db_url, "jdbc:mariadb://db.example.internal:5432/shopdb");
    assert_eq!(request.instance_type, "t3.medium");
    assert_eq!(request.db_username, "shop");
}

/// A fresh project creates the application
#[tokio::test]
async fn test_new_project_creates_application() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    DeploymentPipeline::new(&cloud, &builder)
        .run(config(DbEngine::MySql))
        .await
        .unwrap();

    let log = calls.lock().unwrap();
    match log.last().unwrap() {
        Call::Hosting(req) => assert_eq!(req.action, HostingAction::Create),
        other => panic!("unexpected last call: {:?}", other),
    }
}

/// Custom sizing overrides are what the provider sees
#[tokio::test]
async fn test_custom_sizes_sent_to_provider() {
    let calls = new_log();
    let cloud = FakeCloud::new(calls.clone());
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };

    let mut cfg = config(DbEngine::MySql);
    cfg.instance_type = "custom".into();
    cfg.custom_instance_type = "c7g.large".into();
    cfg.db_instance_class = "custom".into();
    cfg.custom_db_instance_class = "db.r6g.large".into();

    DeploymentPipeline::new(&cloud, &builder)
        .run(cfg)
        .await
        .unwrap();

    let log = calls.lock().unwrap();
    for call in log.iter() {
        match call {
            Call::CreateDatabase(req) => assert_eq!(req.instance_class, "db.r6g.large"),
            Call::Hosting(req) => assert_eq!(req.instance_type, "c7g.large"),
            _ => {}
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl PipelineObserver for RecordingObserver {
    fn step_started(&self, step: Step) {
        self.events.lock().unwrap().push(format!("start {}", step));
    }

    fn step_succeeded(&self, step: Step, message: Option<&str>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok {} {}", step, message.unwrap_or("-")));
    }

    fn step_failed(&self, step: Step, error: &DeploymentError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("fail {} {}", step, error));
    }
}

/// The observer hears about every step start and outcome
#[tokio::test]
async fn test_observer_narration() {
    let calls = new_log();
    let cloud = FakeCloud::failing_at(
        calls.clone(),
        Step::UploadArtifact,
        Failure::Message("NoSuchBucket".into()),
    );
    let builder = FakeBuilder {
        calls: calls.clone(),
        fail: false,
    };
    let observer = RecordingObserver::default();

    let _ = DeploymentPipeline::new(&cloud, &builder)
        .with_observer(&observer)
        .run(config(DbEngine::MySql))
        .await;

    let events = observer.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "start build".to_string(),
            "ok build -".to_string(),
            "start create-bucket".to_string(),
            "ok create-bucket Bucket store-artifacts created".to_string(),
            "start upload-artifact".to_string(),
            "fail upload-artifact NoSuchBucket".to_string(),
        ]
    );
}
