use crate::narration::TerminalObserver;
use clap::Args;
use colored::Colorize;
use shipflow_build::{BuildTool, WrapperBuilder};
use shipflow_cloud::CloudServices;
use shipflow_cloud_aws::AwsServices;
use shipflow_core::{DeploymentConfig, DeploymentError, DeploymentPipeline, resolve_deployment};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Project directory (holds the build wrapper and the settings file)
    #[arg(long, env = "SHIPFLOW_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Build tool (maven or gradle), overriding the project settings
    #[arg(long, env = "SHIPFLOW_BUILD_TOOL")]
    pub build_tool: Option<BuildTool>,

    /// Elastic Beanstalk application name
    #[arg(long, env = "SHIPFLOW_APPLICATION_NAME")]
    pub application_name: Option<String>,

    /// Elastic Beanstalk environment name
    #[arg(long, env = "SHIPFLOW_ENVIRONMENT_NAME")]
    pub environment_name: Option<String>,

    /// S3 bucket receiving the WAR
    #[arg(long, env = "SHIPFLOW_BUCKET_NAME")]
    pub bucket_name: Option<String>,

    /// EC2 instance type, or "custom" together with --custom-instance-type
    #[arg(long, env = "SHIPFLOW_INSTANCE_TYPE")]
    pub instance_type: Option<String>,

    #[arg(long, env = "SHIPFLOW_CUSTOM_INSTANCE_TYPE")]
    pub custom_instance_type: Option<String>,

    /// RDS instance class, or "custom" together with --custom-db-instance-class
    #[arg(long, env = "SHIPFLOW_DB_INSTANCE_CLASS")]
    pub db_instance_class: Option<String>,

    #[arg(long, env = "SHIPFLOW_CUSTOM_DB_INSTANCE_CLASS")]
    pub custom_db_instance_class: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Database name
    #[arg(long, env = "SHIPFLOW_DB_NAME")]
    pub db_name: Option<String>,

    /// Database master username (never saved)
    #[arg(long, env = "SHIPFLOW_DB_USERNAME")]
    pub db_username: Option<String>,

    /// Database master password (never saved)
    #[arg(long, env = "SHIPFLOW_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Named AWS profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Run without confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl DeployArgs {
    /// Explicit values win over what the settings file provided
    pub fn apply(&self, config: &mut DeploymentConfig) {
        let overrides = [
            (&self.application_name, &mut config.application_name),
            (&self.environment_name, &mut config.environment_name),
            (&self.bucket_name, &mut config.bucket_name),
            (&self.instance_type, &mut config.instance_type),
            (&self.custom_instance_type, &mut config.custom_instance_type),
            (&self.db_instance_class, &mut config.db_instance_class),
            (
                &self.custom_db_instance_class,
                &mut config.custom_db_instance_class,
            ),
            (&self.region, &mut config.aws_region),
            (&self.db_name, &mut config.db_name),
            (&self.db_username, &mut config.db_username),
            (&self.db_password, &mut config.db_password),
        ];

        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        if let Some(tool) = self.build_tool {
            config.build_tool = tool;
        }
    }
}

fn fail(error: &DeploymentError) -> ! {
    eprintln!();
    eprintln!("{}", error.user_message().red().bold());
    std::process::exit(1);
}

fn print_plan(config: &DeploymentConfig, project_root: &Path) {
    let mode = if config.existing_project {
        "update existing deployment"
    } else {
        "new deployment"
    };

    println!("{}", "Deployment plan".bold());
    println!("  Project:      {}", project_root.display());
    println!("  Mode:         {}", mode.cyan());
    println!("  Build tool:   {}", config.build_tool);
    println!("  Region:       {}", config.aws_region.cyan());
    println!("  Application:  {}", config.application_name.cyan());
    println!("  Environment:  {}", config.environment_name.cyan());
    println!("  Bucket:       {}", config.bucket_name);
    println!("  Instance:     {}", config.effective_instance_type());
    println!(
        "  Database:     {} ({}, {})",
        config.db_name,
        config.db_engine.creation_name(),
        config.effective_db_instance_class()
    );
}

pub async fn handle(args: DeployArgs) -> anyhow::Result<()> {
    let project_root = args.project_dir.clone();
    let store = shipflow_config::open(&project_root);
    let mut settings = store.load()?;

    let mut config = resolve_deployment(&settings).unwrap_or_else(|e| fail(&e));
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        fail(&e);
    }

    print_plan(&config, &project_root);

    if !args.yes {
        println!();
        println!(
            "{}",
            "Warning: this builds the project and creates billable AWS resources.".yellow()
        );
        println!("Run again with --yes to deploy");
        return Ok(());
    }

    settings.aws = Some(config.to_settings());
    store.save(&settings)?;
    tracing::debug!("Settings saved to {}", store.path().display());

    let services =
        AwsServices::connect(config.aws_region.clone(), args.profile.as_deref(), &project_root)
            .await;

    let auth = services.check_auth().await?;
    if !auth.authenticated {
        eprintln!(
            "{} {}",
            "AWS credentials are not usable:".red().bold(),
            auth.error.unwrap_or_default()
        );
        std::process::exit(1);
    }
    if let Some(account) = &auth.account_info {
        println!();
        println!("Deploying with {}", account.cyan());
    }

    let builder = WrapperBuilder::new(&project_root);
    let observer = TerminalObserver::new();
    let pipeline = DeploymentPipeline::new(&services, &builder).with_observer(&observer);

    match pipeline.run(config).await {
        Ok(deployed) => {
            println!();
            println!("{}", "Deployment started successfully".green().bold());
            println!(
                "  Environment {} of {} is running version {}",
                deployed.environment_name.cyan(),
                deployed.application_name.cyan(),
                deployed.war_key().unwrap_or_default()
            );
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
