//! `vcctl template`: create job templates from jobs, and jobs from templates.

use clap::{Args, Subcommand};
use tracing::info;

use vcctl_common::crd::Job;
use vcctl_common::{Unstructured, JOB_TEMPLATE_KIND};
use vcctl_job::{
    generate_template, run_template, GenerateOptions, KubeJobStore, KubeTemplateStore, RunOptions,
    SourceRef,
};

use super::ConnectionArgs;
use crate::Result;

/// Manage job templates
#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Generate a job template from an existing job
    Generate(TemplateSourceArgs),
    /// Run a job from a job template
    Run(TemplateSourceArgs),
}

/// Flags naming the source object and the new object's name
#[derive(Args, Debug, Clone)]
pub struct TemplateSourceArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The yaml file of the source object; takes precedence over --name
    #[arg(long, short = 'f', default_value = "")]
    pub filename: String,

    /// The namespace of the source object
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// The name of the source object
    #[arg(long, short = 'N', default_value = "")]
    pub name: String,

    /// The name of the object to create (defaults to the source's name)
    #[arg(long = "generateName", short = 'g', default_value = "")]
    pub generate_name: String,
}

impl TemplateSourceArgs {
    fn source(&self) -> SourceRef {
        SourceRef::from_flags(&self.filename, &self.name, &self.namespace)
    }

    fn generate_name(&self) -> Option<String> {
        Some(self.generate_name.clone()).filter(|n| !n.is_empty())
    }
}

/// Run a `vcctl template` subcommand.
pub async fn run(args: TemplateArgs) -> Result<()> {
    match args.command {
        TemplateCommand::Generate(args) => generate(args).await,
        TemplateCommand::Run(args) => run_job(args).await,
    }
}

async fn generate(args: TemplateSourceArgs) -> Result<()> {
    let client = args.connection.client().await?;
    let jobs = KubeJobStore::new(client.clone());
    let templates = KubeTemplateStore::new(client);

    let opts = GenerateOptions {
        source: args.source(),
        generate_name: args.generate_name(),
    };
    let created = generate_template(&opts, &jobs, &templates).await?;

    println!("{}", generated_message(&created));
    Ok(())
}

async fn run_job(args: TemplateSourceArgs) -> Result<()> {
    let client = args.connection.client().await?;
    let templates = KubeTemplateStore::new(client.clone());
    let jobs = KubeJobStore::new(client);

    let opts = RunOptions {
        source: args.source(),
        generate_name: args.generate_name(),
    };
    let job = run_template(&opts, &templates, &jobs).await?;

    info!(
        namespace = ?job.metadata.namespace,
        queue = %job.display_queue(),
        "job submitted"
    );
    println!("{}", run_message(&job));
    Ok(())
}

fn generated_message(template: &Unstructured) -> String {
    format!(
        "{}/{} created",
        template.kind().unwrap_or(JOB_TEMPLATE_KIND),
        template.name()
    )
}

fn run_message(job: &Job) -> String {
    format!(
        "run job {} successfully",
        job.metadata.name.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    use crate::{Cli, Commands};

    fn parse(args: &[&str]) -> TemplateCommand {
        let cli = Cli::try_parse_from(args).expect("args should parse");
        match cli.command {
            Commands::Template(t) => t.command,
        }
    }

    #[test]
    fn generate_short_flags() {
        let cmd = parse(&[
            "vcctl", "template", "generate", "-s", "https://10.0.0.1:6443", "-k", "/tmp/kc",
            "-n", "ns1", "-N", "demo", "-g", "demo-tmpl",
        ]);
        let TemplateCommand::Generate(args) = cmd else {
            panic!("expected generate");
        };
        assert_eq!(args.connection.master.as_deref(), Some("https://10.0.0.1:6443"));
        assert_eq!(args.connection.kubeconfig.as_deref(), Some("/tmp/kc"));
        assert_eq!(args.namespace, "ns1");
        assert_eq!(args.name, "demo");
        assert_eq!(args.generate_name(), Some("demo-tmpl".to_string()));

        let source = args.source();
        assert_eq!(source.file, None);
        assert_eq!(source.name.as_deref(), Some("demo"));
    }

    #[test]
    fn run_long_flags_and_defaults() {
        let cmd = parse(&[
            "vcctl",
            "template",
            "run",
            "--filename",
            "tmpl.yaml",
            "--generateName",
            "newjob",
        ]);
        let TemplateCommand::Run(args) = cmd else {
            panic!("expected run");
        };
        assert_eq!(args.namespace, "default");
        assert_eq!(args.name, "");
        assert!(args.connection.master.is_none());

        let source = args.source();
        assert_eq!(source.file.as_deref(), Some(std::path::Path::new("tmpl.yaml")));
        assert_eq!(source.namespace, "default");
        assert_eq!(args.generate_name(), Some("newjob".to_string()));
    }

    #[test]
    fn empty_generate_name_is_unset() {
        let TemplateCommand::Run(args) = parse(&["vcctl", "template", "run", "-N", "tmpl1"]) else {
            panic!("expected run");
        };
        assert_eq!(args.generate_name(), None);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["vcctl", "template", "delete"]).is_err());
    }

    #[test]
    fn confirmation_lines() {
        let template = Unstructured::from_value(json!({
            "kind": "JobTemplate",
            "metadata": {"name": "demo-tmpl", "namespace": "ns1"}
        }))
        .unwrap();
        assert_eq!(generated_message(&template), "JobTemplate/demo-tmpl created");

        let job: Job = serde_json::from_value(json!({
            "metadata": {"name": "newjob", "namespace": "ns1"},
            "spec": {}
        }))
        .unwrap();
        assert_eq!(run_message(&job), "run job newjob successfully");
    }
}
