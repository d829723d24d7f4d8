use std::sync::Arc;

use chrono::Utc;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler},
    model::{
        CallToolResult, ErrorData, GetPromptRequestParam, GetPromptResult, Implementation,
        ListPromptsResult, ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam,
        ReadResourceResult, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};

use super::server_info::{process_started_at, SERVER_NAME, SERVER_VERSION};
use crate::{
    lib::{
        errors::{FetchError, ServerSetupError},
        http::{HttpFetch, ReqwestFetcher},
        inference::{HfInferenceClient, ImageInference},
        telemetry::InvocationSpan,
    },
    prompts::PromptRegistry,
    resources::{server_info as server_info_resource, ResourceRegistry},
    server::config::ServerConfig,
    tools::{
        self, calculator, envelope, geocode, greet, image,
        schema::ToolArguments,
        time, weather, CalculatorRequest, GeocodeRequest, GreetRequest, ImageRequest,
        ServerToolRouter, TimeRequest, WeatherRequest, CALCULATOR_TOOL_ID, GEOCODE_TOOL_ID,
        GREET_TOOL_ID, IMAGE_TOOL_ID, TIME_TOOL_ID, WEATHER_TOOL_ID,
    },
};

/// The outbound collaborators handlers may call.
#[derive(Clone)]
pub struct OutboundClients {
    pub http: Arc<dyn HttpFetch>,
    pub inference: Arc<dyn ImageInference>,
}

impl OutboundClients {
    /// `reqwest`-backed clients pointed at the configured endpoints.
    pub fn from_config(config: &ServerConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: Arc::new(ReqwestFetcher::new()?),
            inference: Arc::new(HfInferenceClient::new(config.inference.base_url.clone())?),
        })
    }
}

/// Server facade handed to the MCP runtime.
#[derive(Clone)]
pub struct ToolboxServer {
    config: Arc<ServerConfig>,
    instructions: Arc<String>,
    tool_router: ServerToolRouter<Self>,
    prompts: Arc<PromptRegistry>,
    resources: Arc<ResourceRegistry>,
    clients: OutboundClients,
}

impl ToolboxServer {
    pub fn new(config: ServerConfig, instructions: String) -> Result<Self, ServerSetupError> {
        let clients = OutboundClients::from_config(&config)?;
        Self::with_clients(config, instructions, clients)
    }

    pub fn with_clients(
        config: ServerConfig,
        instructions: String,
        clients: OutboundClients,
    ) -> Result<Self, ServerSetupError> {
        let prompts = PromptRegistry::with_defaults()?;
        let mut resources = ResourceRegistry::default();
        resources.register(server_info_resource::definition(process_started_at()))?;

        Ok(Self {
            config: Arc::new(config),
            instructions: Arc::new(instructions),
            tool_router: tools::build_router(Self::tool_router),
            prompts: Arc::new(prompts),
            resources: Arc::new(resources),
            clients,
        })
    }

    /// Tools as advertised to clients.
    pub fn registered_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    pub fn credential_configured(&self) -> bool {
        self.config.inference.token.is_some()
    }
}

#[tool_router(router = tool_router)]
impl ToolboxServer {
    #[tool(
        name = "greet",
        description = "Greet someone by name in Korean or English"
    )]
    async fn greet(
        &self,
        Parameters(arguments): Parameters<ToolArguments<GreetRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(GREET_TOOL_ID);
        let text = greet::greet(&request);
        span.finish_ok();
        Ok(envelope::text_envelope(text))
    }

    #[tool(name = "calculator", description = "Apply +, -, * or / to two numbers")]
    async fn calculator(
        &self,
        Parameters(arguments): Parameters<ToolArguments<CalculatorRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(CALCULATOR_TOOL_ID);
        let result = calculator::calculate(&request).map(|calc| calc.to_string());
        span.finish(&result);
        Ok(envelope::from_text_result(result))
    }

    #[tool(
        name = "get-time",
        description = "Show the current date and time in an IANA timezone"
    )]
    async fn get_time(
        &self,
        Parameters(arguments): Parameters<ToolArguments<TimeRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(TIME_TOOL_ID);
        let result = time::format_in_timezone(&request.timezone, Utc::now());
        span.finish(&result);
        Ok(envelope::from_text_result(result))
    }

    #[tool(name = "geocode", description = "Look up the coordinates of an address")]
    async fn geocode(
        &self,
        Parameters(arguments): Parameters<ToolArguments<GeocodeRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(GEOCODE_TOOL_ID);
        let result = geocode::geocode(
            self.clients.http.as_ref(),
            &self.config.http,
            &request.address,
        )
        .await
        .map(|place| place.to_string());
        span.finish(&result);
        Ok(envelope::from_text_result(result))
    }

    #[tool(
        name = "get-weather",
        description = "Show current weather and a daily forecast for coordinates"
    )]
    async fn get_weather(
        &self,
        Parameters(arguments): Parameters<ToolArguments<WeatherRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(WEATHER_TOOL_ID);
        let result =
            weather::get_weather(self.clients.http.as_ref(), &self.config.http, &request).await;
        span.finish(&result);
        Ok(envelope::from_text_result(result))
    }

    #[tool(
        name = "generate-image",
        description = "Generate an image from a text prompt"
    )]
    async fn generate_image(
        &self,
        Parameters(arguments): Parameters<ToolArguments<ImageRequest>>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = arguments.into_validated()?;
        let span = InvocationSpan::start(IMAGE_TOOL_ID);
        let result = image::generate_image(
            self.clients.inference.as_ref(),
            &self.config.inference,
            &request.prompt,
        )
        .await;
        span.finish(&result);
        Ok(envelope::from_image_result(result))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ToolboxServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Implementation::default()
            },
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult::with_all_items(self.prompts.list()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        self.prompts
            .render(&request.name, request.arguments.as_ref())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(self.resources.list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.resources.read(&request.uri)
    }
}
