use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema};

use arcade_types::{Game, Stage, User};

use crate::dispatch::{
    CreateGameRequest, CreateStageRequest, CreateUserRequest, Dispatcher, UpdateGameRequest,
    UpdateStageRequest, UpdateUserRequest,
};
use crate::error::GatewayError;

pub type ArcadeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(dispatcher: Arc<Dispatcher>) -> ArcadeSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(dispatcher)
        .finish()
}

fn graphql_error(err: GatewayError) -> async_graphql::Error {
    let code = err.code();
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

#[derive(InputObject)]
pub struct CreateGameInput {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

impl From<CreateGameInput> for CreateGameRequest {
    fn from(input: CreateGameInput) -> Self {
        Self {
            id: input.id,
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(InputObject)]
pub struct UpdateGameInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateGameInput> for UpdateGameRequest {
    fn from(input: UpdateGameInput) -> Self {
        Self {
            id: None,
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(InputObject)]
pub struct CreateStageInput {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

impl From<CreateStageInput> for CreateStageRequest {
    fn from(input: CreateStageInput) -> Self {
        Self {
            id: input.id,
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(InputObject)]
pub struct UpdateStageInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateStageInput> for UpdateStageRequest {
    fn from(input: UpdateStageInput) -> Self {
        Self {
            id: None,
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(InputObject)]
pub struct CreateUserInput {
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl From<CreateUserInput> for CreateUserRequest {
    fn from(input: CreateUserInput) -> Self {
        Self {
            id: input.id,
            username: input.username,
            password: input.password,
            email: input.email,
        }
    }
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserInput> for UpdateUserRequest {
    fn from(input: UpdateUserInput) -> Self {
        Self {
            id: None,
            username: input.username,
            password: input.password,
            email: input.email,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn game(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Game> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.get_game(&id).await.map_err(graphql_error)
    }

    async fn games(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
    ) -> async_graphql::Result<Vec<Game>> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.list_games(query).await.map_err(graphql_error)
    }

    async fn stage(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Stage> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.get_stage(&id).await.map_err(graphql_error)
    }

    async fn stages(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
    ) -> async_graphql::Result<Vec<Stage>> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.list_stages(query).await.map_err(graphql_error)
    }

    async fn user(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<User> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.get_user(&id).await.map_err(graphql_error)
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
    ) -> async_graphql::Result<Vec<User>> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher.list_users(query).await.map_err(graphql_error)
    }
}

pub struct MutationRoot;

/// Mutations always take the synchronous RPC path, whatever the REST
/// dispatch policy says: the schema promises the created entity back,
/// and an enqueue ack has no entity to offer.
#[Object]
impl MutationRoot {
    async fn create_game(
        &self,
        ctx: &Context<'_>,
        input: CreateGameInput,
    ) -> async_graphql::Result<Game> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .create_game_via_rpc(input.into())
            .await
            .map_err(graphql_error)
    }

    async fn update_game(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateGameInput,
    ) -> async_graphql::Result<Game> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .update_game(&id, input.into())
            .await
            .map_err(graphql_error)
    }

    async fn delete_game(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .delete_game(&id)
            .await
            .map(|_| true)
            .map_err(graphql_error)
    }

    async fn create_stage(
        &self,
        ctx: &Context<'_>,
        input: CreateStageInput,
    ) -> async_graphql::Result<Stage> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .create_stage_via_rpc(input.into())
            .await
            .map_err(graphql_error)
    }

    async fn update_stage(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateStageInput,
    ) -> async_graphql::Result<Stage> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .update_stage(&id, input.into())
            .await
            .map_err(graphql_error)
    }

    async fn delete_stage(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .delete_stage(&id)
            .await
            .map(|_| true)
            .map_err(graphql_error)
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> async_graphql::Result<User> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .create_user_via_rpc(input.into())
            .await
            .map_err(graphql_error)
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateUserInput,
    ) -> async_graphql::Result<User> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .update_user(&id, input.into())
            .await
            .map_err(graphql_error)
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let dispatcher = ctx.data::<Arc<Dispatcher>>()?;
        dispatcher
            .delete_user(&id)
            .await
            .map(|_| true)
            .map_err(graphql_error)
    }
}
