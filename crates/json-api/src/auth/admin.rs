//! Admin guard.

use salvo::prelude::*;

use crate::extensions::*;

/// Reject requests from users without the admin role.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let is_admin = match depot.user_or_401() {
        Ok(user) => user.is_admin(),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    if !is_admin {
        res.render(StatusError::forbidden().brief("Admin role required"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
