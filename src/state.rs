//! Process wiring: pool, repositories, senders and use cases, constructed
//! once at startup and shared behind `Arc`s.

use std::sync::Arc;

use anyhow::Result;

use kw_app::usecases::{
    CheckDomain, CreateAccessRequest, DecideAccessRequest, EnsureActiveCode, GenerateAccessCode,
    PendingRequestsForOwner, RecentAccessLog, ValidateAccessCode, VerifyAccessRequest,
};
use kw_app::{AccessLogger, NotificationDispatcher};
use kw_core::ports::{ClockPort, EmailSenderPort, SmsSenderPort};
use kw_infra::db::mappers::{
    AccessCodeRowMapper, AccessLogRowMapper, AccessRequestRowMapper, DomainRuleRowMapper,
    PropertyRowMapper, VerificationCodeRowMapper,
};
use kw_infra::db::repositories::{
    DieselAccessCodeRepository, DieselAccessLogRepository, DieselAccessRequestRepository,
    DieselDomainRuleRepository, DieselPropertyRepository, DieselVerificationCodeRepository,
};
use kw_infra::db::{init_db_pool, DieselSqliteExecutor};
use kw_infra::notify::{DisabledMailer, DisabledSmsSender, HttpApiMailer, TwilioSmsSender};
use kw_infra::SystemClock;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub create: Arc<CreateAccessRequest>,
    pub verify: Arc<VerifyAccessRequest>,
    pub decide: Arc<DecideAccessRequest>,
    pub pending: Arc<PendingRequestsForOwner>,
    pub validate_code: Arc<ValidateAccessCode>,
    pub generate_code: Arc<GenerateAccessCode>,
    pub check_domain: Arc<CheckDomain>,
    pub recent_log: Arc<RecentAccessLog>,
}

impl AppState {
    pub fn build(config: &ServerConfig) -> Result<Self> {
        let pool = init_db_pool(&config.database_url)?;
        let executor = DieselSqliteExecutor::new(pool);
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

        let properties = Arc::new(DieselPropertyRepository::new(
            executor.clone(),
            PropertyRowMapper,
        ));
        let requests = Arc::new(DieselAccessRequestRepository::new(
            executor.clone(),
            AccessRequestRowMapper,
        ));
        let codes = Arc::new(DieselAccessCodeRepository::new(
            executor.clone(),
            AccessCodeRowMapper,
        ));
        let verifications = Arc::new(DieselVerificationCodeRepository::new(
            executor.clone(),
            VerificationCodeRowMapper,
        ));
        let rules = Arc::new(DieselDomainRuleRepository::new(
            executor.clone(),
            DomainRuleRowMapper,
        ));
        let log = Arc::new(DieselAccessLogRepository::new(executor, AccessLogRowMapper));

        let email: Arc<dyn EmailSenderPort> = match &config.mailer {
            Some(mailer_config) => Arc::new(
                HttpApiMailer::new(mailer_config.clone())
                    .map_err(|e| anyhow::anyhow!("failed to build mailer: {e}"))?,
            ),
            None => Arc::new(DisabledMailer),
        };
        let sms: Arc<dyn SmsSenderPort> = match &config.twilio {
            Some(twilio_config) => Arc::new(
                TwilioSmsSender::new(twilio_config.clone())
                    .map_err(|e| anyhow::anyhow!("failed to build SMS sender: {e}"))?,
            ),
            None => Arc::new(DisabledSmsSender),
        };

        let dispatcher = Arc::new(NotificationDispatcher::new(
            email,
            sms,
            config.base_url.clone(),
        ));
        let logger = AccessLogger::new(log.clone(), clock.clone());
        let ensure_code = Arc::new(EnsureActiveCode::new(codes.clone(), clock.clone()));
        let check_domain = Arc::new(CheckDomain::new(rules, clock.clone()));

        Ok(Self {
            create: Arc::new(CreateAccessRequest::new(
                properties.clone(),
                requests.clone(),
                verifications.clone(),
                ensure_code,
                check_domain.clone(),
                dispatcher.clone(),
                logger.clone(),
                clock.clone(),
            )),
            verify: Arc::new(VerifyAccessRequest::new(
                requests.clone(),
                verifications,
                logger.clone(),
                clock.clone(),
            )),
            decide: Arc::new(DecideAccessRequest::new(
                requests.clone(),
                properties.clone(),
                codes.clone(),
                dispatcher,
                logger.clone(),
                clock.clone(),
            )),
            pending: Arc::new(PendingRequestsForOwner::new(
                requests,
                properties.clone(),
                clock.clone(),
            )),
            validate_code: Arc::new(ValidateAccessCode::new(
                codes.clone(),
                properties.clone(),
                logger,
                clock.clone(),
            )),
            generate_code: Arc::new(GenerateAccessCode::new(
                codes,
                properties.clone(),
                clock,
            )),
            check_domain,
            recent_log: Arc::new(RecentAccessLog::new(log, properties)),
        })
    }
}
