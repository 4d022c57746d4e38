use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use duckov_cards::config::Config;
use duckov_cards::game::load_content_root;
use duckov_cards::proto::card_packs_server::{CardPacks, CardPacksServer};
use duckov_cards::proto::{
    CardInfo, GetCardRequest, ListSetsRequest, ListSetsResponse, OpenPackRequest,
    OpenPackResponse, OpenPacksRequest, ResetRequest, ResetResponse,
};
use duckov_cards::service::{card_info, open_pack_response, set_infos, ServiceError, ServiceState};

/// 單次串流開包上限
const MAX_STREAMED_PACKS: u32 = 1000;

// ============================================================================
// gRPC 服務
// ============================================================================

struct CardPacksService {
    state: Arc<ServiceState>,
}

fn to_status(err: ServiceError) -> Status {
    match err {
        ServiceError::UnknownPack(_) | ServiceError::UnknownCard(_) => {
            Status::not_found(err.to_string())
        }
    }
}

#[tonic::async_trait]
impl CardPacks for CardPacksService {
    async fn list_sets(
        &self,
        _request: Request<ListSetsRequest>,
    ) -> Result<Response<ListSetsResponse>, Status> {
        Ok(Response::new(ListSetsResponse {
            sets: set_infos(self.state.catalog()),
        }))
    }

    async fn get_card(&self, request: Request<GetCardRequest>) -> Result<Response<CardInfo>, Status> {
        let type_id = request.into_inner().type_id;
        let card = self.state.card(type_id).map_err(to_status)?;
        Ok(Response::new(card_info(card)))
    }

    async fn open_pack(
        &self,
        request: Request<OpenPackRequest>,
    ) -> Result<Response<OpenPackResponse>, Status> {
        let OpenPackRequest { player_id, pack_id } = request.into_inner();
        let cards = self
            .state
            .open_pack(&player_id, pack_id)
            .map_err(to_status)?;
        Ok(Response::new(open_pack_response(pack_id, &cards)))
    }

    type OpenPacksStream = ReceiverStream<Result<OpenPackResponse, Status>>;

    async fn open_packs(
        &self,
        request: Request<OpenPacksRequest>,
    ) -> Result<Response<Self::OpenPacksStream>, Status> {
        let OpenPacksRequest {
            player_id,
            pack_id,
            count,
        } = request.into_inner();

        if count > MAX_STREAMED_PACKS {
            return Err(Status::invalid_argument(format!(
                "count {count} exceeds limit {MAX_STREAMED_PACKS}"
            )));
        }
        if self.state.catalog().pack(pack_id).is_none() {
            return Err(to_status(ServiceError::UnknownPack(pack_id)));
        }

        let (tx, rx) = mpsc::channel(16);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            for _ in 0..count {
                let message = state
                    .open_pack(&player_id, pack_id)
                    .map(|cards| open_pack_response(pack_id, &cards))
                    .map_err(to_status);
                if tx.send(message).await.is_err() {
                    // 客戶端已斷線
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn reset(&self, request: Request<ResetRequest>) -> Result<Response<ResetResponse>, Status> {
        let ResetRequest { player_id, seed } = request.into_inner();
        self.state.reset(&player_id, seed);
        Ok(Response::new(ResetResponse {}))
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    init_tracing(&config.log_filter);

    let catalog = load_content_root(&config.content_dir)?;
    if catalog.is_empty() {
        warn!(dir = %config.content_dir.display(), "no card sets loaded");
    }
    info!(
        sets = catalog.set_names().len(),
        cards = catalog.cards().len(),
        packs = catalog.packs().len(),
        "catalog ready"
    );

    let addr = config.listen_addr.parse()?;
    let service = CardPacksService {
        state: Arc::new(ServiceState::new(Arc::new(catalog), config.seed)),
    };

    info!(%addr, "CardPacks gRPC server listening");

    tonic::transport::Server::builder()
        .add_service(CardPacksServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}
