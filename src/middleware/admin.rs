use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::auth::identity::AuthError;
use crate::auth::session::RevokedSessions;
use crate::middleware::auth::validate_session_from_request;

/// Admits requests carrying a valid, unrevoked admin session and hands the
/// decoded `SessionClaims` to handlers through the request extensions.
pub struct AdminMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdminMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let claims = match validate_session_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };
        let revoked = req.app_data::<web::Data<RevokedSessions>>().cloned();

        Box::pin(async move {
            if let Some(revoked) = revoked {
                if revoked.is_revoked(&claims.jti).await {
                    tracing::warn!("Signed-out session used for admin access: {}", claims.email);
                    return Err(AuthError::Token("Session has been signed out".into()).into());
                }
            }

            req.extensions_mut().insert(claims);
            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
