//! The uniform tool representation handed to agents.
//!
//! Every tool, whether it comes from a provider registry, a plugin, or the
//! core wallet tools, ends up as a [`Tool`]: a name, a description, a
//! [`ParameterSchema`] and an asynchronous executor taking JSON parameters.
//!
//! # OpenAI API Alignment
//!
//! [`Tool::definition`] produces a [`ToolDefinition`], which serializes to
//! OpenAI's function calling format (`{"type": "function", "function": {...}}`)
//! and supports `strict` mode for Structured Outputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use goat::schema::ParameterSchema;
//! use goat::tool::{ToolConfig, create_sync_tool};
//!
//! let tool = create_sync_tool(
//!     ToolConfig::new("ping", "Reply with pong", ParameterSchema::empty()),
//!     |_| Ok(serde_json::json!("pong")),
//! );
//! assert_eq!(tool.execute(serde_json::json!({})).await?, "pong");
//! ```

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ToolError;
use crate::schema::ParameterSchema;

/// A type alias for `Result<T, ToolError>`.
pub type ToolResult<T> = Result<T, ToolError>;

/// Future returned by a tool executor.
pub type ToolFuture = BoxFuture<'static, ToolResult<Value>>;

type Executor = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

/// Definition of a tool for LLM function calling.
///
/// Serializes to OpenAI's function calling format:
/// ```json
/// {
///     "type": "function",
///     "function": {
///         "name": "get_balance",
///         "description": "Get the balance of an address",
///         "parameters": { ... },
///         "strict": true
///     }
/// }
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ToolDefinition {
    /// Name of the tool (e.g., "get_balance").
    pub name: String,

    /// Description of what the tool does.
    pub description: String,

    /// JSON schema for the tool's parameters.
    pub parameters: Value,

    /// Whether to use strict schema validation (OpenAI Structured Outputs).
    pub strict: Option<bool>,
}

impl ToolDefinition {
    /// Create a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            strict: None,
        }
    }

    /// Enable strict schema validation (Structured Outputs).
    ///
    /// Adds `"additionalProperties": false` to the parameters schema unless
    /// the schema already sets it.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        if strict
            && let Some(obj) = self.parameters.as_object_mut()
            && !obj.contains_key("additionalProperties")
        {
            obj.insert("additionalProperties".to_owned(), Value::Bool(false));
        }
        self
    }

    /// Check if strict mode is enabled.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self.strict, Some(true))
    }
}

/// Custom serialization to OpenAI function calling format.
impl Serialize for ToolDefinition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut function = serde_json::Map::new();
        function.insert("name".to_owned(), Value::String(self.name.clone()));
        function.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        function.insert("parameters".to_owned(), self.parameters.clone());
        if let Some(strict) = self.strict {
            function.insert("strict".to_owned(), Value::Bool(strict));
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "function")?;
        map.serialize_entry("function", &function)?;
        map.end()
    }
}

/// Name, description and parameter schema of a tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Tool name.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// Input schema.
    pub parameters: ParameterSchema,
}

impl ToolConfig {
    /// Create a new tool configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A callable tool with its wallet client and provider already bound.
///
/// Cloning is cheap: the executor is shared.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    parameters: ParameterSchema,
    strict: bool,
    executor: Executor,
}

impl Tool {
    /// Tool name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Input schema.
    #[inline]
    #[must_use]
    pub const fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    /// Whether the definition is emitted in strict mode.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Run the tool.
    ///
    /// # Errors
    ///
    /// Propagates whatever the executor returns.
    pub async fn execute(&self, parameters: Value) -> ToolResult<Value> {
        (self.executor)(parameters).await
    }

    /// Run the tool with arguments as produced by an LLM.
    ///
    /// Accepts both a JSON object and a string holding encoded JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] if a string argument is not
    /// valid JSON, otherwise propagates the executor's result.
    pub async fn call_json(&self, args: Value) -> ToolResult<Value> {
        let args = match args {
            Value::String(s) => serde_json::from_str(&s)?,
            other => other,
        };
        self.execute(args).await
    }

    /// Get the tool definition for LLM function calling.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        let definition = ToolDefinition::new(
            self.name.clone(),
            self.description.clone(),
            self.parameters.descriptor().clone(),
        );
        if self.strict {
            definition.with_strict(true)
        } else {
            definition
        }
    }

    /// Emit the definition in strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Append the parameter listing to the description.
    #[must_use]
    pub fn with_parameter_docs(mut self) -> Self {
        self.description = self.parameters.describe_in(&self.description);
        self
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters.name())
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

/// Build a [`Tool`] from its configuration and an asynchronous executor.
///
/// The executor receives the raw parameters and is responsible for any
/// validation.
pub fn create_tool<F, Fut>(config: ToolConfig, executor: F) -> Tool
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ToolResult<Value>> + Send + 'static,
{
    Tool {
        name: config.name,
        description: config.description,
        parameters: config.parameters,
        strict: false,
        executor: Arc::new(move |parameters| executor(parameters).boxed()),
    }
}

/// Build a [`Tool`] from a synchronous executor.
///
/// The resulting tool is still awaited like any other.
pub fn create_sync_tool<F>(config: ToolConfig, executor: F) -> Tool
where
    F: Fn(Value) -> ToolResult<Value> + Send + Sync + 'static,
{
    create_tool(config, move |parameters| future::ready(executor(parameters)))
}

/// Serialize a tool method's output into the JSON handed back to the agent.
///
/// # Errors
///
/// Returns [`ToolError::Execution`] if the output cannot be serialized.
pub fn to_output_value<O: Serialize>(output: O) -> ToolResult<Value> {
    serde_json::to_value(output).map_err(|e| ToolError::execution(e.to_string()))
}

/// A tool method's return value, on its way to becoming tool output.
///
/// Used by the code `#[tools]` generates. `into_tool_output` resolves to
/// [`FallibleOutput`] for any `Result` (the error is propagated as a
/// [`ToolError`]) and to [`PlainOutput`] for every other serializable value.
#[doc(hidden)]
pub struct ToolOutput<T>(Cell<Option<T>>);

impl<T> fmt::Debug for ToolOutput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolOutput").finish_non_exhaustive()
    }
}

impl<T> ToolOutput<T> {
    /// Wrap a method's return value.
    pub const fn new(output: T) -> Self {
        Self(Cell::new(Some(output)))
    }

    fn take(&self) -> ToolResult<T> {
        self.0
            .take()
            .ok_or_else(|| ToolError::execution("tool output already consumed"))
    }
}

/// Conversion of a `Result`-returning tool method.
#[doc(hidden)]
#[allow(clippy::wrong_self_convention)]
pub trait FallibleOutput {
    /// Success type.
    type Output;
    /// Error type.
    type Error;

    /// Serialize the success value or propagate the error.
    ///
    /// # Errors
    ///
    /// Returns the method's error converted into a [`ToolError`].
    fn into_tool_output(&self) -> ToolResult<Value>
    where
        Self::Output: Serialize,
        Self::Error: Into<ToolError>;
}

impl<T, E> FallibleOutput for ToolOutput<Result<T, E>> {
    type Output = T;
    type Error = E;

    fn into_tool_output(&self) -> ToolResult<Value>
    where
        T: Serialize,
        E: Into<ToolError>,
    {
        to_output_value(self.take()?.map_err(Into::<ToolError>::into)?)
    }
}

/// Conversion of a tool method returning a plain value.
#[doc(hidden)]
#[allow(clippy::wrong_self_convention)]
pub trait PlainOutput {
    /// Serialize the value.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Execution`] if the value cannot be serialized.
    fn into_tool_output(&self) -> ToolResult<Value>;
}

impl<T: Serialize> PlainOutput for &ToolOutput<T> {
    fn into_tool_output(&self) -> ToolResult<Value> {
        to_output_value(self.take()?)
    }
}

/// An ordered, name-indexed collection of tools.
///
/// Preserves insertion order so definitions reach the LLM in the order the
/// collector produced them.
#[derive(Default, Clone)]
pub struct ToolSet {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolSet {
    /// Create a new empty tool set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool with the same name is replaced in place.
    pub fn add(&mut self, tool: Tool) {
        if let Some(&position) = self.index.get(tool.name()) {
            warn!(tool = %tool.name(), "Replacing tool with duplicate name");
            self.tools[position] = tool;
        } else {
            self.index.insert(tool.name().to_owned(), self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Check if the set contains a tool with the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    /// All tool definitions, in order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(Tool::definition).collect()
    }

    /// Iterate over the tools in order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Call a tool by name with JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for unknown names, otherwise whatever
    /// the tool returns.
    pub async fn call(&self, name: &str, args: Value) -> ToolResult<Value> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;
        tool.call_json(args).await
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        let mut set = Self::new();
        for tool in iter {
            set.add(tool);
        }
        set
    }
}

impl From<Vec<Tool>> for ToolSet {
    fn from(tools: Vec<Tool>) -> Self {
        tools.into_iter().collect()
    }
}

impl IntoIterator for ToolSet {
    type Item = Tool;
    type IntoIter = std::vec::IntoIter<Tool>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.into_iter()
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.names())
            .finish()
    }
}
