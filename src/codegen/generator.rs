//! Source emitter for the typed server generator
//!
//! Emits the generated file section by section: imports, handler traits,
//! request records with enum types, catalogs, dispatch routers, and the
//! `new_handler` constructor. Every map- or set-like source is converted to
//! a sorted or declaration-ordered sequence before emission so output is
//! byte-stable.

use std::collections::BTreeSet;

use serde_json::Value;

use super::{
    enum_repr, pascal_case, screaming_snake_case, snake_case, value_as_integer, EnumRepr,
    ServerDefinition, ToolSpec,
};

pub(crate) struct Generator<'a> {
    buf: String,
    def: &'a ServerDefinition,
    module: &'a str,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(def: &'a ServerDefinition, module: &'a str) -> Self {
        Self {
            buf: String::new(),
            def,
            module,
        }
    }

    pub(crate) fn generate(mut self) -> String {
        self.emit_header();
        self.emit_imports();
        self.emit_prompt_handlers();
        self.emit_tool_handlers();
        self.emit_prompt_list();
        self.emit_tool_list();
        self.emit_resource_template_list();
        self.emit_routers();
        self.emit_new_handler();
        self.buf
    }

    fn println(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn has_prompt_types(&self) -> bool {
        !self.def.prompts.is_empty()
    }

    fn has_tool_types(&self) -> bool {
        !self.def.tools.is_empty()
    }

    fn wires_prompts(&self) -> bool {
        self.def.capabilities.prompts.is_some() && self.has_prompt_types()
    }

    fn wires_tools(&self) -> bool {
        self.def.capabilities.tools.is_some() && self.has_tool_types()
    }

    fn wires_resources(&self) -> bool {
        self.def.capabilities.resources.is_some()
    }

    fn wires_completions(&self) -> bool {
        self.def.capabilities.completions.is_some()
    }

    fn emit_header(&mut self) {
        self.println("// Code generated by rsmcp-codegen. DO NOT EDIT.");
        self.println(&format!(
            "//! Typed MCP server bindings for `{}`.",
            self.module
        ));
        self.blank();
    }

    fn emit_imports(&mut self) {
        let mut external: BTreeSet<&'static str> = BTreeSet::new();
        let mut internal: BTreeSet<&'static str> = BTreeSet::new();

        internal.insert("use rsmcp::protocol::Implementation;");
        internal.insert("use rsmcp::protocol::ServerCapabilities;");
        internal.insert("use rsmcp::server::Handler;");

        if self.def.capabilities.prompts.is_some() {
            internal.insert("use rsmcp::protocol::PromptCapability;");
        }
        if self.def.capabilities.resources.is_some() {
            internal.insert("use rsmcp::protocol::ResourceCapability;");
        }
        if self.def.capabilities.tools.is_some() {
            internal.insert("use rsmcp::protocol::ToolCapability;");
        }
        if self.def.capabilities.logging.is_some() {
            internal.insert("use rsmcp::protocol::LoggingCapability;");
        }
        if self.def.capabilities.completions.is_some() {
            internal.insert("use rsmcp::protocol::CompletionsCapability;");
        }

        if self.has_prompt_types() || self.has_tool_types() {
            external.insert("use async_trait::async_trait;");
            external.insert("use serde::{Deserialize, Serialize};");
            internal.insert("use rsmcp::errors::Error;");
            internal.insert("use rsmcp::server::RequestContext;");
        }
        if self.has_prompt_types() {
            internal.insert("use rsmcp::types::prompts::GetPromptResult;");
            internal.insert("use rsmcp::types::prompts::Prompt;");
            internal.insert("use rsmcp::types::prompts::PromptArgument;");
        }
        if self.has_tool_types() {
            internal.insert("use rsmcp::types::tools::CallToolResult;");
            internal.insert("use rsmcp::types::tools::Tool;");
        }
        if self.wires_prompts() {
            internal.insert("use rsmcp::protocol::decode_params;");
            internal.insert("use rsmcp::protocol::GetPromptRequestParams;");
            internal.insert("use rsmcp::server::PromptHandler;");
        }
        if self.wires_tools() {
            internal.insert("use rsmcp::protocol::decode_params;");
            internal.insert("use rsmcp::protocol::CallToolRequestParams;");
            internal.insert("use rsmcp::protocol::validate_json_schema;");
            internal.insert("use rsmcp::server::ToolHandler;");
        }
        if !self.def.resource_templates.is_empty() {
            internal.insert("use rsmcp::types::resources::ResourceTemplate;");
        }
        if self.wires_resources() {
            internal.insert("use rsmcp::server::ResourceHandler;");
        }
        if self.wires_completions() {
            internal.insert("use rsmcp::server::CompletionHandler;");
        }

        for import in &external {
            self.println(import);
        }
        if !external.is_empty() {
            self.blank();
        }
        for import in &internal {
            self.println(import);
        }
        self.blank();
    }

    fn emit_prompt_handlers(&mut self) {
        if !self.has_prompt_types() {
            return;
        }

        self.println("/// The interface for prompt handlers.");
        self.println("#[async_trait]");
        self.println("pub trait ServerPromptHandler: Send + Sync {");
        for (i, prompt) in self.def.prompts.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.println(&format!("    /// Handle the `{}` prompt.", prompt.name));
            self.println(&format!(
                "    async fn handle_prompt_{}(",
                snake_case(&prompt.name)
            ));
            self.println("        &self,");
            self.println("        cx: &RequestContext,");
            self.println(&format!(
                "        req: Prompt{}Request,",
                pascal_case(&prompt.name)
            ));
            self.println("    ) -> Result<GetPromptResult, Error>;");
        }
        self.println("}");
        self.blank();

        for prompt in &self.def.prompts {
            self.println(&format!(
                "/// Input parameters for the `{}` prompt.",
                prompt.name
            ));
            self.println("#[derive(Debug, Clone, Serialize, Deserialize)]");
            self.println(&format!(
                "pub struct Prompt{}Request {{",
                pascal_case(&prompt.name)
            ));
            for arg in &prompt.arguments {
                self.println(&format!(
                    "    #[serde(rename = {:?}, default)]",
                    arg.name
                ));
                self.println(&format!("    pub {}: String,", snake_case(&arg.name)));
            }
            self.println("}");
            self.blank();
        }
    }

    fn emit_tool_handlers(&mut self) {
        if !self.has_tool_types() {
            return;
        }

        self.println("/// The interface for tool handlers.");
        self.println("#[async_trait]");
        self.println("pub trait ServerToolHandler: Send + Sync {");
        for (i, tool) in self.def.tools.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.println(&format!("    /// Handle the `{}` tool.", tool.name));
            self.println(&format!(
                "    async fn handle_tool_{}(",
                snake_case(&tool.name)
            ));
            self.println("        &self,");
            self.println("        cx: &RequestContext,");
            self.println(&format!(
                "        req: Tool{}Request,",
                pascal_case(&tool.name)
            ));
            self.println("    ) -> Result<CallToolResult, Error>;");
        }
        self.println("}");
        self.blank();

        for tool in &self.def.tools {
            self.emit_tool_enum_types(tool);
            self.emit_tool_request(tool);
        }
    }

    fn emit_tool_enum_types(&mut self, tool: &ToolSpec) {
        for field in &tool.input_schema.fields {
            if field.enum_values.is_empty() {
                continue;
            }
            let type_name = enum_type_name(&tool.name, &field.name);
            self.println(&format!(
                "/// Possible values for the `{}` field of the `{}` tool.",
                field.name, tool.name
            ));
            match enum_repr(&field.enum_values) {
                EnumRepr::Int => {
                    let mut values: Vec<i64> = field
                        .enum_values
                        .iter()
                        .filter_map(value_as_integer)
                        .collect();
                    values.sort_unstable();
                    self.println(
                        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]",
                    );
                    self.println("#[serde(transparent)]");
                    self.println(&format!("pub struct {}(pub i64);", type_name));
                    self.blank();
                    self.println(&format!("impl {} {{", type_name));
                    for value in values {
                        self.println(&format!(
                            "    pub const {}: Self = Self({});",
                            int_const_name(value),
                            value
                        ));
                    }
                    self.println("}");
                }
                EnumRepr::Str => {
                    let mut values: Vec<String> = field
                        .enum_values
                        .iter()
                        .map(value_display)
                        .collect();
                    values.sort_unstable();
                    self.println(
                        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]",
                    );
                    self.println(&format!("pub enum {} {{", type_name));
                    for value in values {
                        self.println(&format!("    #[serde(rename = {:?})]", value));
                        self.println(&format!("    {},", variant_name(&value)));
                    }
                    self.println("}");
                }
            }
            self.blank();
        }
    }

    fn emit_tool_request(&mut self, tool: &ToolSpec) {
        self.println(&format!(
            "/// Input parameters for the `{}` tool.",
            tool.name
        ));
        self.println("#[derive(Debug, Clone, Serialize, Deserialize)]");
        self.println(&format!(
            "pub struct Tool{}Request {{",
            pascal_case(&tool.name)
        ));
        for field in &tool.input_schema.fields {
            let base_type = if field.enum_values.is_empty() {
                field.ty.rust_type().to_string()
            } else {
                enum_type_name(&tool.name, &field.name)
            };
            if field.required {
                self.println(&format!("    #[serde(rename = {:?})]", field.name));
                self.println(&format!(
                    "    pub {}: {},",
                    snake_case(&field.name),
                    base_type
                ));
            } else {
                self.println(&format!(
                    "    #[serde(rename = {:?}, default, skip_serializing_if = \"Option::is_none\")]",
                    field.name
                ));
                self.println(&format!(
                    "    pub {}: Option<{}>,",
                    snake_case(&field.name),
                    base_type
                ));
            }
        }
        self.println("}");
        self.blank();
    }

    fn emit_prompt_list(&mut self) {
        if !self.has_prompt_types() {
            return;
        }

        self.println("/// All prompts offered by this server.");
        self.println("pub fn prompt_list() -> Vec<Prompt> {");
        self.println("    vec![");
        for prompt in &self.def.prompts {
            self.println("        Prompt {");
            self.println(&format!("            name: {:?}.to_string(),", prompt.name));
            self.println(&format!(
                "            description: {},",
                optional_string(&prompt.description)
            ));
            if prompt.arguments.is_empty() {
                self.println("            arguments: vec![],");
            } else {
                self.println("            arguments: vec![");
                for arg in &prompt.arguments {
                    self.println("                PromptArgument {");
                    self.println(&format!(
                        "                    name: {:?}.to_string(),",
                        arg.name
                    ));
                    self.println(&format!(
                        "                    description: {},",
                        optional_string(&arg.description)
                    ));
                    self.println(&format!(
                        "                    required: {},",
                        arg.required
                    ));
                    self.println("                },");
                }
                self.println("            ],");
            }
            self.println("        },");
        }
        self.println("    ]");
        self.println("}");
        self.blank();
    }

    fn emit_tool_list(&mut self) {
        if !self.has_tool_types() {
            return;
        }

        for tool in &self.def.tools {
            let document = tool.input_schema.to_schema_document();
            let text = document.to_string();
            self.println(&format!(
                "/// JSON Schema for the `{}` tool input.",
                tool.name
            ));
            self.println(&format!(
                "pub const TOOL_{}_INPUT_SCHEMA: &str = r##\"{}\"##;",
                screaming_snake_case(&tool.name),
                text
            ));
            self.blank();
        }

        self.println("/// All tools offered by this server.");
        self.println("pub fn tool_list() -> Vec<Tool> {");
        self.println("    vec![");
        for tool in &self.def.tools {
            let document = tool.input_schema.to_schema_document();
            self.println("        Tool {");
            self.println(&format!("            name: {:?}.to_string(),", tool.name));
            self.println(&format!(
                "            description: {},",
                optional_string(&tool.description)
            ));
            self.println(&format!(
                "            input_schema: serde_json::json!({}),",
                document
            ));
            self.println("            annotations: None,");
            self.println("        },");
        }
        self.println("    ]");
        self.println("}");
        self.blank();
    }

    fn emit_resource_template_list(&mut self) {
        if self.def.resource_templates.is_empty() {
            return;
        }

        self.println("/// All resource templates offered by this server.");
        self.println("pub fn resource_template_list() -> Vec<ResourceTemplate> {");
        self.println("    vec![");
        for template in &self.def.resource_templates {
            self.println("        ResourceTemplate {");
            self.println(&format!(
                "            uri_template: {:?}.to_string(),",
                template.uri_template
            ));
            self.println(&format!(
                "            name: {:?}.to_string(),",
                template.name
            ));
            self.println(&format!(
                "            description: {},",
                optional_string(&template.description)
            ));
            self.println(&format!(
                "            mime_type: {},",
                optional_string(&template.mime_type)
            ));
            self.println("            annotations: None,");
            self.println("        },");
        }
        self.println("    ]");
        self.println("}");
        self.blank();
    }

    fn emit_routers(&mut self) {
        if self.wires_prompts() {
            self.println("struct PromptRouter<H> {");
            self.println("    inner: H,");
            self.println("}");
            self.blank();
            self.println("#[async_trait]");
            self.println("impl<H: ServerPromptHandler> PromptHandler for PromptRouter<H> {");
            self.println("    async fn get_prompt(");
            self.println("        &self,");
            self.println("        cx: &RequestContext,");
            self.println("        req: GetPromptRequestParams,");
            self.println("    ) -> Result<GetPromptResult, Error> {");
            self.println("        match req.name.as_str() {");
            for prompt in &self.def.prompts {
                self.println(&format!("            {:?} => {{", prompt.name));
                self.println(&format!(
                    "                let input: Prompt{}Request = decode_params(req.arguments.as_deref())?;",
                    pascal_case(&prompt.name)
                ));
                self.println(&format!(
                    "                self.inner.handle_prompt_{}(cx, input).await",
                    snake_case(&prompt.name)
                ));
                self.println("            }");
            }
            self.println(
                "            _ => Err(Error::Prompt(format!(\"prompt not found: {}\", req.name))),",
            );
            self.println("        }");
            self.println("    }");
            self.println("}");
            self.blank();
        }

        if self.wires_tools() {
            self.println("struct ToolRouter<H> {");
            self.println("    inner: H,");
            self.println("}");
            self.blank();
            self.println("#[async_trait]");
            self.println("impl<H: ServerToolHandler> ToolHandler for ToolRouter<H> {");
            self.println("    async fn call_tool(");
            self.println("        &self,");
            self.println("        cx: &RequestContext,");
            self.println("        req: CallToolRequestParams,");
            self.println("    ) -> Result<CallToolResult, Error> {");
            self.println("        match req.name.as_str() {");
            for tool in &self.def.tools {
                self.println(&format!("            {:?} => {{", tool.name));
                self.println(&format!(
                    "                let input: Tool{}Request = decode_params(req.arguments.as_deref())?;",
                    pascal_case(&tool.name)
                ));
                self.println("                let document = serde_json::to_value(&input)?;");
                self.println(&format!(
                    "                validate_json_schema(TOOL_{}_INPUT_SCHEMA, &document)?;",
                    screaming_snake_case(&tool.name)
                ));
                self.println(&format!(
                    "                self.inner.handle_tool_{}(cx, input).await",
                    snake_case(&tool.name)
                ));
                self.println("            }");
            }
            self.println(
                "            _ => Err(Error::Tool(format!(\"tool not found: {}\", req.name))),",
            );
            self.println("        }");
            self.println("    }");
            self.println("}");
            self.blank();
        }
    }

    fn emit_new_handler(&mut self) {
        let mut generics: Vec<(&str, String, &str)> = Vec::new();
        if self.wires_prompts() {
            generics.push(("P", "prompt_handler".to_string(), "ServerPromptHandler"));
        }
        if self.wires_resources() {
            generics.push(("R", "resource_handler".to_string(), "ResourceHandler"));
        }
        if self.wires_tools() {
            generics.push(("T", "tool_handler".to_string(), "ServerToolHandler"));
        }
        if self.wires_completions() {
            generics.push(("C", "completion_handler".to_string(), "CompletionHandler"));
        }

        self.println("/// Creates a dispatcher wired to this server definition.");
        if generics.is_empty() {
            self.println("pub fn new_handler() -> Handler {");
        } else {
            let params: Vec<String> = generics
                .iter()
                .map(|(letter, _, _)| letter.to_string())
                .collect();
            self.println(&format!("pub fn new_handler<{}>(", params.join(", ")));
            for (letter, name, _) in &generics {
                self.println(&format!("    {}: {},", name, letter));
            }
            self.println(") -> Handler");
            self.println("where");
            for (letter, _, bound) in &generics {
                self.println(&format!("    {}: {} + 'static,", letter, bound));
            }
            self.println("{");
        }

        self.println("    let mut capabilities = ServerCapabilities::default();");
        if let Some(prompts) = &self.def.capabilities.prompts {
            self.println(&format!(
                "    capabilities.prompts = Some(PromptCapability {{ list_changed: {} }});",
                prompts.list_changed
            ));
        }
        if let Some(resources) = &self.def.capabilities.resources {
            self.println("    capabilities.resources = Some(ResourceCapability {");
            self.println(&format!("        subscribe: {},", resources.subscribe));
            self.println(&format!("        list_changed: {},", resources.list_changed));
            self.println("    });");
        }
        if let Some(tools) = &self.def.capabilities.tools {
            self.println(&format!(
                "    capabilities.tools = Some(ToolCapability {{ list_changed: {} }});",
                tools.list_changed
            ));
        }
        if self.def.capabilities.logging.is_some() {
            self.println("    capabilities.logging = Some(LoggingCapability {});");
        }
        if self.def.capabilities.completions.is_some() {
            self.println("    capabilities.completions = Some(CompletionsCapability {});");
        }

        self.println("    let implementation = Implementation {");
        self.println(&format!(
            "        name: {:?}.to_string(),",
            self.def.implementation.name
        ));
        self.println(&format!(
            "        version: {:?}.to_string(),",
            self.def.implementation.version
        ));
        self.println("    };");

        let has_wiring = !generics.is_empty();
        if has_wiring {
            self.println("    let mut handler = Handler::new(capabilities, implementation);");
        } else {
            self.println("    let handler = Handler::new(capabilities, implementation);");
        }
        if self.wires_prompts() {
            self.println("    handler = handler.with_prompts(prompt_list());");
            self.println(
                "    handler = handler.with_prompt_handler(PromptRouter { inner: prompt_handler });",
            );
        }
        if self.wires_resources() {
            if !self.def.resource_templates.is_empty() {
                self.println(
                    "    handler = handler.with_resource_templates(resource_template_list());",
                );
            }
            self.println("    handler = handler.with_resource_handler(resource_handler);");
        }
        if self.wires_tools() {
            self.println("    handler = handler.with_tools(tool_list());");
            self.println(
                "    handler = handler.with_tool_handler(ToolRouter { inner: tool_handler });",
            );
        }
        if self.wires_completions() {
            self.println("    handler = handler.with_completion_handler(completion_handler);");
        }
        self.println("    handler");
        self.println("}");
    }
}

fn enum_type_name(tool: &str, field: &str) -> String {
    format!("{}{}Type", pascal_case(tool), pascal_case(field))
}

fn int_const_name(value: i64) -> String {
    if value < 0 {
        format!("VN{}", -value)
    } else {
        format!("V{}", value)
    }
}

fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn variant_name(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    pascal_case(&sanitized)
}

fn optional_string(value: &Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => format!("Some({:?}.to_string())", s),
        _ => "None".to_string(),
    }
}
