//! Crew definition and execution

use agent_core::{Context, Error, Result};
use tracing::{error, info, instrument};

use crate::task::{Task, TaskOutput};

/// How a crew schedules its tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Process {
    /// Run tasks one at a time, in the order they were added
    #[default]
    Sequential,
}

/// Result of a successful crew run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewOutput {
    /// Answer of the last task
    pub raw: String,
    /// Answers of every task, in execution order
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Answer of the task with the given name
    pub fn task(&self, name: &str) -> Option<&str> {
        self.tasks_output
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.raw.as_str())
    }
}

/// A group of agents working through a list of tasks
///
/// Tasks do not see each other's answers: each prompt is fixed when the task
/// is built. The first failing task stops the run.
///
/// # Example
///
/// ```no_run
/// use agent_workflow::{Crew, Task};
/// use agent_core::Context;
/// use std::sync::Arc;
///
/// # async fn example(agent: Arc<dyn agent_core::Agent>) -> agent_core::Result<()> {
/// let crew = Crew::builder()
///     .task(Task::new("classify", "Classify AAPL", "Bullish, Bearish, or Neutral", agent))
///     .build()?;
///
/// let output = crew.kickoff(Context::new()).await?;
/// println!("{}", output.raw);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Crew {
    tasks: Vec<Task>,
    process: Process,
}

impl Crew {
    /// Create a new crew builder
    pub fn builder() -> CrewBuilder {
        CrewBuilder::new()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn process(&self) -> Process {
        self.process
    }

    /// Run every task and collect the answers
    #[instrument(skip_all, fields(request_id = context.request_id().unwrap_or("-"), tasks = self.tasks.len()))]
    pub async fn kickoff(&self, mut context: Context) -> Result<CrewOutput> {
        match self.process {
            Process::Sequential => self.run_sequential(&mut context).await,
        }
    }

    async fn run_sequential(&self, context: &mut Context) -> Result<CrewOutput> {
        let mut tasks_output = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let agent = task.agent();
            info!(task = task.name(), agent = agent.name(), "starting task");
            context.set_task_name(task.name());

            let raw = agent
                .process(task.prompt(), context)
                .await
                .inspect_err(|e| error!(task = task.name(), error = %e, "task failed"))?;

            context.record_task_output(task.name(), &raw);
            tasks_output.push(TaskOutput {
                name: task.name().to_string(),
                agent: agent.name().to_string(),
                raw,
            });
        }

        let raw = tasks_output
            .last()
            .map(|t| t.raw.clone())
            .ok_or_else(|| Error::ProcessingFailed("Crew finished without output".to_string()))?;

        Ok(CrewOutput { raw, tasks_output })
    }
}

/// Builder for constructing crews
#[derive(Debug, Default)]
pub struct CrewBuilder {
    tasks: Vec<Task>,
    process: Process,
}

impl CrewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Set the process
    pub fn process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    /// Build the crew
    ///
    /// # Errors
    ///
    /// Returns an error if no task was added
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(Error::InitializationFailed(
                "A crew needs at least one task".to_string(),
            ));
        }

        Ok(Crew {
            tasks: self.tasks,
            process: self.process,
        })
    }
}
