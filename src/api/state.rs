use std::ops::Deref;
use std::sync::Arc;

use derive_new::new;

use crate::service::RankingService;

#[derive(Clone, new)]
pub struct App {
    pub service: Arc<dyn RankingService>,
}

impl Deref for App {
    type Target = dyn RankingService;

    fn deref(&self) -> &Self::Target {
        self.service.as_ref()
    }
}
