use crate::domain::model::HolidayRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部節假日資料來源
#[async_trait]
pub trait HolidayGateway: Send + Sync {
    /// 取得整年度的節假日資料，失敗時回傳 `CrawlError::GatewayError`
    async fn fetch_year(&self, year: i32) -> Result<Vec<HolidayRecord>>;
}

#[async_trait]
impl<G: HolidayGateway + ?Sized> HolidayGateway for std::sync::Arc<G> {
    async fn fetch_year(&self, year: i32) -> Result<Vec<HolidayRecord>> {
        (**self).fetch_year(year).await
    }
}
