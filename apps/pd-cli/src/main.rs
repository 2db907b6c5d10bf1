use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pd_app::viz::{DirViewerSink, JsonLinesChannel, ModelViewOptions};
use pd_app::{
    AppError, AppResult, DaylightFactorInputs, DashboardConfig, Host, JobRequest, JobStatusReport,
    job_service, resolve_api_key, status_service, viz,
};
use pd_cloud::{ApiClient, JobApi, MemoryJobApi};
use pd_core::{JobRef, ProjectRef};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(about = "Pollination dashboard CLI - submit daylight jobs, track them, visualize results", long_about = None)]
struct Cli {
    /// Path to a dashboard config YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a model and submit a daylight-factor job
    Submit(SubmitArgs),
    /// Show the status of a job
    Status {
        /// Project owner
        owner: String,
        /// Project name
        project: String,
        /// Job ID
        job_id: String,
        /// API key (defaults to POLLINATION_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Re-check every N seconds until the job finishes
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Visualize results
    #[command(subcommand)]
    Viz(VizCommands),
}

#[derive(Args)]
struct SubmitArgs {
    /// Project owner
    owner: String,
    /// Project name
    project: String,
    /// Path to the HBJSON model
    model_path: PathBuf,
    /// Job name
    #[arg(long, default_value = "daylight-factor")]
    name: String,
    /// Job description
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cpu_count: Option<u32>,
    /// Pattern selecting the sensor grids to simulate
    #[arg(long)]
    grid_filter: Option<String>,
    /// Minimum number of sensors per CPU
    #[arg(long)]
    min_sensor_count: Option<u32>,
    /// Radiance parameters; pass an empty string to omit them
    #[arg(long, allow_hyphen_values = true)]
    radiance_parameters: Option<String>,
    /// Recipe as owner/name[:tag] (overrides the config)
    #[arg(long)]
    recipe: Option<String>,
    /// API key (defaults to POLLINATION_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
    /// Print the job request instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum VizCommands {
    /// Send a model and its result meshes to the host application
    Mesh {
        /// Path to the HBJSON model
        model_path: PathBuf,
        /// Results folder containing grids_info.json (repeatable)
        #[arg(long = "results", required = true)]
        results: Vec<PathBuf>,
        /// Display name for each results folder, in order (repeatable)
        #[arg(long = "name")]
        names: Vec<String>,
        /// Override the detected host (rhino or web)
        #[arg(long)]
        host: Option<Host>,
        /// Write host messages to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Publish a pre-exported scene file to the embedded viewer
    Scene {
        /// Scene file (e.g. .vtkjs)
        scene_path: PathBuf,
        /// Viewer key
        #[arg(long, default_value = "scene")]
        key: String,
        /// Directory served to the viewer page
        #[arg(long, default_value = "viewer")]
        out_dir: PathBuf,
        /// Override the detected host (rhino or web)
        #[arg(long)]
        host: Option<Host>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let result = run(Cli::parse());
    if let Err(err) = &result {
        if let Some(hint) = err.hint() {
            eprintln!("hint: {}", hint);
        }
    }
    result
}

fn run(cli: Cli) -> AppResult<()> {
    let config = DashboardConfig::load_or_default(cli.config.as_deref())?;

    // Probed once; everything downstream receives it.
    let detected_host = Host::detect();

    match cli.command {
        Commands::Submit(args) => cmd_submit(&config, args),
        Commands::Status {
            owner,
            project,
            job_id,
            api_key,
            watch,
        } => {
            let job = JobRef::new(owner, project, job_id)?;
            cmd_status(&config, &job, api_key, watch)
        }
        Commands::Viz(viz_cmd) => match viz_cmd {
            VizCommands::Mesh {
                model_path,
                results,
                names,
                host,
                out,
            } => cmd_viz_mesh(
                host.unwrap_or(detected_host),
                &model_path,
                results,
                names,
                out.as_deref(),
            ),
            VizCommands::Scene {
                scene_path,
                key,
                out_dir,
                host,
            } => cmd_viz_scene(host.unwrap_or(detected_host), &scene_path, &key, out_dir),
        },
    }
}

fn cmd_submit(config: &DashboardConfig, args: SubmitArgs) -> AppResult<()> {
    let defaults = DaylightFactorInputs::from(&config.defaults);
    let inputs = DaylightFactorInputs {
        cpu_count: args.cpu_count.unwrap_or(defaults.cpu_count),
        grid_filter: args.grid_filter.unwrap_or(defaults.grid_filter),
        min_sensor_count: args.min_sensor_count.unwrap_or(defaults.min_sensor_count),
        radiance_parameters: args.radiance_parameters.or(defaults.radiance_parameters),
    };
    let recipe = match &args.recipe {
        Some(raw) => raw.parse()?,
        None => config.recipe.clone(),
    };

    let request = JobRequest {
        project: ProjectRef::new(args.owner, args.project)?,
        recipe,
        name: args.name,
        description: args.description,
        inputs,
        model_path: &args.model_path,
    };

    if args.dry_run {
        let api = MemoryJobApi::new();
        job_service::create_job(&api, &request)?;
        for body in api.created_jobs() {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        return Ok(());
    }

    let client = ApiClient::new(config.client_config(resolve_api_key(args.api_key)?))?;
    println!(
        "Submitting '{}' to {} ({})",
        request.name, request.project, request.recipe
    );
    let job = job_service::create_job(&client, &request)?;

    println!("✓ Job created: {}", job.job_id);
    println!(
        "  URL: {}",
        pd_core::dashboard_url_with_base(
            &config.api.app_url,
            job.owner(),
            job.project_name(),
            &job.job_id
        )
    );
    Ok(())
}

fn cmd_status(
    config: &DashboardConfig,
    job: &JobRef,
    api_key: Option<String>,
    watch: Option<u64>,
) -> AppResult<()> {
    let client = ApiClient::new(config.client_config(resolve_api_key(api_key)?))?;

    let Some(interval) = watch else {
        let report = fetch_status(&client, config, job)?;
        print_status(&report);
        return Ok(());
    };

    let interval = Duration::from_secs(interval.max(1));
    let mut last = None;
    loop {
        let report = fetch_status(&client, config, job)?;
        if last.as_ref() != Some(&report.remote) {
            print_status(&report);
            last = Some(report.remote.clone());
        }
        if report.status.is_terminal() {
            return Ok(());
        }
        tracing::debug!(seconds = interval.as_secs(), "waiting before next status check");
        std::thread::sleep(interval);
    }
}

fn fetch_status(
    client: &impl JobApi,
    config: &DashboardConfig,
    job: &JobRef,
) -> AppResult<JobStatusReport> {
    status_service::get_job_status_with_app(client, job, &config.api.app_url)
}

fn print_status(report: &JobStatusReport) {
    println!("Job status: {} ({})", report.status, report.remote);
    if let Some(message) = &report.message {
        println!("  {}", message);
    }
    println!("Job URL: {}", report.url);
}

fn cmd_viz_mesh(
    host: Host,
    model_path: &Path,
    results: Vec<PathBuf>,
    names: Vec<String>,
    out: Option<&Path>,
) -> AppResult<()> {
    let sets = pd_results::result_sets(results, names)?;

    let writer = host_output(host, out)?;
    let mut backend = viz::select_backend(
        host,
        || JsonLinesChannel::new(writer),
        || DirViewerSink::new("viewer"),
    );

    let summary = viz::visualize_model_with_mesh(
        backend.as_mut(),
        model_path,
        &sets,
        &ModelViewOptions::default(),
    )?;

    if summary.result_sets.is_empty() {
        eprintln!("Host '{}' does not accept meshes; nothing sent", host);
    } else {
        eprintln!(
            "✓ Sent {} result set(s): {} grids, {} values",
            summary.result_sets.len(),
            summary.grids,
            summary.values
        );
    }
    Ok(())
}

/// Where host messages go. `--out` is only opened when a host will read it.
fn host_output(host: Host, out: Option<&Path>) -> AppResult<Box<dyn Write>> {
    match out {
        Some(path) if host.is_cad_plugin() => Ok(Box::new(BufWriter::new(File::create(path)?))),
        Some(path) => {
            tracing::debug!(path = %path.display(), host = %host, "no host plugin; --out left untouched");
            Ok(Box::new(io::sink()))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn cmd_viz_scene(host: Host, scene_path: &Path, key: &str, out_dir: PathBuf) -> AppResult<()> {
    if host.is_cad_plugin() {
        return Err(AppError::InvalidInput(format!(
            "scene files are rendered by the embedded viewer, not inside {}",
            host
        )));
    }

    let mut backend = viz::select_backend(
        host,
        || JsonLinesChannel::new(io::stdout()),
        || DirViewerSink::new(out_dir),
    );
    viz::show_scene(backend.as_mut(), scene_path, key)?;
    println!("✓ Scene '{}' published", key);
    Ok(())
}
